use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use log::{info, warn};

use crate::api::ClockwiseRepository;
use crate::config::Config;
use crate::datetime::{self, parse_date, parse_time, YearMonth};
use crate::entry::{NewTimeEntry, TimeEntry, TimeEntryDraft};
use crate::validation::{Outcome, ValidationResult, WorkTimeRules};

/// `work`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct WorkArgs {
    #[clap(subcommand)]
    action: WorkAction,
}

#[derive(Debug, clap::Subcommand)]
enum WorkAction {
    /// 勤務時間エントリーを追加する
    Add(WorkEntryArgs),
    /// 勤務時間エントリーを更新する
    Update {
        #[clap(long = "id", help = "Id of the time entry to update")]
        id: i64,
        #[clap(flatten)]
        entry: WorkEntryArgs,
    },
    /// 勤務時間エントリーを削除する
    Delete {
        #[clap(long = "id", help = "Id of the time entry to delete")]
        id: i64,
    },
}

/// 勤務時間エントリーの入力値。
#[derive(Clone, Debug, Default, clap::Args)]
pub struct WorkEntryArgs {
    #[clap(short = 'a', long = "activity", default_value = "", help = "What was done")]
    activity: String,

    #[clap(short = 'p', long = "project", default_value = "", help = "Project or course")]
    project: String,

    #[clap(
        short = 'd',
        long = "date",
        help = "Date of the entry in the format YYYY-MM-DD",
        parse(try_from_str = parse_date),
    )]
    date: Option<NaiveDate>,

    #[clap(
        short = 's',
        long = "start",
        help = "Start time in the format HH:MM",
        parse(try_from_str = parse_time),
    )]
    start: Option<NaiveTime>,

    #[clap(
        short = 'e',
        long = "end",
        help = "End time in the format HH:MM",
        parse(try_from_str = parse_time),
    )]
    end: Option<NaiveTime>,

    #[clap(
        short = 'b',
        long = "break",
        allow_hyphen_values = true,
        help = "Break time in minutes"
    )]
    break_minutes: Option<i64>,

    #[clap(
        long = "confirm-overtime",
        help = "Submit even if working time exceeds the recommended maximum"
    )]
    confirm_overtime: bool,

    #[clap(long = "allow-zero-break", help = "Accept a break time of 0 minutes")]
    allow_zero_break: bool,
}

impl WorkEntryArgs {
    /// 入力値から検証対象のドラフトを作成する。
    pub fn draft(&self) -> TimeEntryDraft {
        TimeEntryDraft {
            activity: self.activity.clone(),
            project: self.project.clone(),
            date: self.date,
            start_time: self.start,
            end_time: self.end,
            break_minutes: self.break_minutes,
        }
    }

    /// フラグに応じた検証ルールを返す。
    pub fn rules(&self) -> WorkTimeRules {
        let mut rules = WorkTimeRules::default();
        if self.confirm_overtime {
            rules = rules.with_confirmed_overtime();
        }
        if self.allow_zero_break {
            rules = rules.with_zero_break_allowed();
        }
        rules
    }
}

/// `work`サブコマンドの結果。
#[derive(Debug, PartialEq)]
pub enum WorkOutcome {
    Saved(TimeEntry),
    Deleted(i64),
    Rejected(ValidationResult),
}

pub struct WorkCommand<'a, T: ClockwiseRepository> {
    clockwise_client: &'a T,
    config: &'a Config,
}

impl<'a, T: ClockwiseRepository> WorkCommand<'a, T> {
    /// 新しい`WorkCommand`を返す。
    ///
    /// # Arguments
    /// * `clockwise_client` - Clockwise APIと通信するためのリポジトリ
    /// * `config` - 対象ユーザーを含む設定
    pub fn new(clockwise_client: &'a T, config: &'a Config) -> Self {
        Self {
            clockwise_client,
            config,
        }
    }

    /// `work`サブコマンドの処理を行う。
    ///
    /// 追加と更新では送信前にエントリーを検証し、違反があれば送信せずに検証結果を返す。
    /// エントリーの日付の月のタイムシートに登録する。
    pub async fn run(&self, args: WorkArgs) -> Result<WorkOutcome> {
        match args.action {
            WorkAction::Add(entry) => self.save(None, &entry).await,
            WorkAction::Update { id, entry } => self.save(Some(id), &entry).await,
            WorkAction::Delete { id } => {
                self.clockwise_client
                    .delete_time_entry(id)
                    .await
                    .context("Failed to delete time entry")?;
                Ok(WorkOutcome::Deleted(id))
            }
        }
    }

    async fn save(&self, id: Option<i64>, args: &WorkEntryArgs) -> Result<WorkOutcome> {
        let draft = args.draft();
        let result = args.rules().validate_work_entry(&draft, datetime::now());
        match result.outcome() {
            Outcome::Valid => {}
            Outcome::SoftWarning => {
                warn!("Working time exceeds the recommended maximum. Rerun with --confirm-overtime to submit anyway.");
                return Ok(WorkOutcome::Rejected(result));
            }
            Outcome::HardFailure => return Ok(WorkOutcome::Rejected(result)),
        }

        let username = self.config.username(None)?;
        let month = YearMonth::of(draft.date.context("Date is missing")?);
        let timesheet = self
            .clockwise_client
            .read_timesheet(&username, month.month, month.year)
            .await
            .context("Failed to resolve timesheet for the entry")?;
        info!("Timesheet resolved: {}", timesheet.id);

        let request = NewTimeEntry::from_draft(timesheet.id, &draft)?;
        let saved = match id {
            Some(id) => self
                .clockwise_client
                .update_time_entry(id, &request)
                .await
                .context("Failed to update time entry")?,
            None => self
                .clockwise_client
                .create_time_entry(&request)
                .await
                .context("Failed to create time entry")?,
        };

        Ok(WorkOutcome::Saved(saved))
    }
}
