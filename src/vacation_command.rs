use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;

use crate::api::ClockwiseRepository;
use crate::config::Config;
use crate::datetime::{parse_date, YearMonth};
use crate::entry::{NewVacationEntry, VacationEntry, VacationEntryDraft};
use crate::validation::{validate_vacation_entry, ValidationResult};

/// `vacation`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct VacationArgs {
    #[clap(subcommand)]
    action: VacationAction,
}

#[derive(Debug, clap::Subcommand)]
enum VacationAction {
    /// 休暇エントリーを追加する
    Add(VacationEntryArgs),
    /// 休暇エントリーを更新する
    Update {
        #[clap(long = "id", help = "Id of the vacation entry to update")]
        id: i64,
        #[clap(flatten)]
        entry: VacationEntryArgs,
    },
}

/// 休暇エントリーの入力値。
#[derive(Clone, Debug, Default, clap::Args)]
pub struct VacationEntryArgs {
    #[clap(
        short = 'd',
        long = "date",
        help = "Date of the vacation in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(
        short = 'l',
        long = "duration",
        default_value = "",
        help = "Duration in the format HH:MM"
    )]
    duration: String,
}

impl VacationEntryArgs {
    /// 入力値から検証対象のドラフトを作成する。
    pub fn draft(&self) -> VacationEntryDraft {
        VacationEntryDraft {
            date: self.date,
            duration: self.duration.clone(),
        }
    }
}

/// `vacation`サブコマンドの結果。
#[derive(Debug, PartialEq)]
pub enum VacationOutcome {
    Saved(VacationEntry),
    Rejected(ValidationResult),
}

pub struct VacationCommand<'a, T: ClockwiseRepository> {
    clockwise_client: &'a T,
    config: &'a Config,
}

impl<'a, T: ClockwiseRepository> VacationCommand<'a, T> {
    /// 新しい`VacationCommand`を返す。
    pub fn new(clockwise_client: &'a T, config: &'a Config) -> Self {
        Self {
            clockwise_client,
            config,
        }
    }

    /// `vacation`サブコマンドの処理を行う。
    ///
    /// 日付と時間の長さが入力されていない場合は送信せずに検証結果を返す。
    pub async fn run(&self, args: VacationArgs) -> Result<VacationOutcome> {
        let (id, entry) = match args.action {
            VacationAction::Add(entry) => (None, entry),
            VacationAction::Update { id, entry } => (Some(id), entry),
        };

        let draft = entry.draft();
        let result = validate_vacation_entry(&draft);
        if !result.is_valid() {
            return Ok(VacationOutcome::Rejected(result));
        }

        let username = self.config.username(None)?;
        let month = YearMonth::of(draft.date.context("Date is missing")?);
        let timesheet = self
            .clockwise_client
            .read_timesheet(&username, month.month, month.year)
            .await
            .context("Failed to resolve timesheet for the vacation")?;
        info!("Timesheet resolved: {}", timesheet.id);

        let request = NewVacationEntry::from_draft(timesheet.id, &draft)?;
        let saved = match id {
            Some(id) => self
                .clockwise_client
                .update_vacation_entry(id, &request)
                .await
                .context("Failed to update vacation entry")?,
            None => self
                .clockwise_client
                .create_vacation_entry(&request)
                .await
                .context("Failed to create vacation entry")?,
        };

        Ok(VacationOutcome::Saved(saved))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;

    use super::{VacationAction, VacationArgs, VacationCommand, VacationEntryArgs, VacationOutcome};
    use crate::api::MockClockwiseRepository;
    use crate::config::Config;
    use crate::entry::{NewVacationEntry, Timesheet, TimesheetStatus, VacationEntry};
    use crate::validation::ViolationKind;

    fn config() -> Config {
        Config {
            api_url: "http://localhost".to_string(),
            api_token: "token".to_string(),
            username: Some("hiwi".to_string()),
        }
    }

    fn timesheet() -> Timesheet {
        Timesheet {
            id: 8,
            username: "hiwi".to_string(),
            month: 7,
            year: 2024,
            status: TimesheetStatus::NotSubmitted,
            hours_due: 40.0,
            hours_worked: 0.0,
        }
    }

    fn saved(id: i64, request: &NewVacationEntry) -> VacationEntry {
        VacationEntry {
            id,
            timesheet_id: request.timesheet_id,
            date: request.date,
            duration_minutes: request.duration_minutes,
        }
    }

    fn entry_args(duration: &str) -> VacationEntryArgs {
        VacationEntryArgs {
            date: NaiveDate::from_ymd_opt(2024, 7, 1),
            duration: duration.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_vacation() {
        let mut clockwise = MockClockwiseRepository::new();
        clockwise
            .expect_read_timesheet()
            .withf(|username, month, year| username == "hiwi" && *month == 7 && *year == 2024)
            .times(1)
            .returning(|_, _, _| Ok(timesheet()));
        clockwise
            .expect_create_vacation_entry()
            .withf(|request: &NewVacationEntry| request.duration_minutes == 480)
            .times(1)
            .returning(|request| Ok(saved(5, request)));
        let config = config();
        let args = VacationArgs {
            action: VacationAction::Add(entry_args("08:00")),
        };

        let command = VacationCommand::new(&clockwise, &config);
        let outcome = command.run(args).await.unwrap();

        assert!(matches!(
            outcome,
            VacationOutcome::Saved(ref entry) if entry.id == 5 && entry.timesheet_id == 8
        ));
    }

    #[tokio::test]
    async fn test_update_vacation() {
        let mut clockwise = MockClockwiseRepository::new();
        clockwise
            .expect_read_timesheet()
            .times(1)
            .returning(|_, _, _| Ok(timesheet()));
        clockwise
            .expect_update_vacation_entry()
            .withf(|id, _| *id == 5)
            .times(1)
            .returning(|id, request| Ok(saved(id, request)));
        let config = config();
        let args = VacationArgs {
            action: VacationAction::Update {
                id: 5,
                entry: entry_args("04:30"),
            },
        };

        let command = VacationCommand::new(&clockwise, &config);
        let outcome = command.run(args).await.unwrap();

        assert!(matches!(
            outcome,
            VacationOutcome::Saved(ref entry) if entry.duration_minutes == 270
        ));
    }

    #[rstest]
    #[case::empty_duration(entry_args(""))]
    #[case::missing_date(VacationEntryArgs { date: None, ..entry_args("08:00") })]
    #[tokio::test]
    async fn test_incomplete_vacation_is_not_sent(#[case] entry: VacationEntryArgs) {
        let mut clockwise = MockClockwiseRepository::new();
        clockwise.expect_read_timesheet().times(0);
        clockwise.expect_create_vacation_entry().times(0);
        let config = config();
        let args = VacationArgs {
            action: VacationAction::Add(entry),
        };

        let command = VacationCommand::new(&clockwise, &config);
        let outcome = command.run(args).await.unwrap();

        assert!(matches!(
            outcome,
            VacationOutcome::Rejected(ref result) if result.violations[0].field == ViolationKind::MissingFields
        ));
    }

    /// 形式が不正な時間の長さは検証を通過するが、送信前にエラーとなる。
    #[tokio::test]
    async fn test_malformed_duration_fails_before_sending() {
        let mut clockwise = MockClockwiseRepository::new();
        clockwise
            .expect_read_timesheet()
            .times(1)
            .returning(|_, _, _| Ok(timesheet()));
        clockwise.expect_create_vacation_entry().times(0);
        let config = config();
        let args = VacationArgs {
            action: VacationAction::Add(entry_args("all day")),
        };

        let command = VacationCommand::new(&clockwise, &config);
        let result = command.run(args).await;

        assert!(result.is_err());
    }
}
