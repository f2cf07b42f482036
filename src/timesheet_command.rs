use anyhow::{Context, Result};
use log::info;

use crate::api::ClockwiseRepository;
use crate::config::Config;
use crate::datetime::{self, parse_month, YearMonth};
use crate::entry::{TimeEntry, Timesheet};

/// `timesheet`サブコマンドの引数。
#[derive(Debug, clap::Args)]
pub struct TimesheetArgs {
    #[clap(subcommand)]
    action: TimesheetAction,
}

#[derive(Debug, clap::Subcommand)]
enum TimesheetAction {
    /// 指定した月のタイムシートと勤務時間エントリーを表示する
    Show {
        #[clap(short = 'u', long = "user", help = "Username of the timesheet owner")]
        user: Option<String>,
        #[clap(
            short = 'm',
            long = "month",
            help = "Sets a custom month in the format YYYY-MM",
            parse(try_from_str = parse_month),
        )]
        month: Option<YearMonth>,
    },
    /// ユーザーのタイムシートを一覧表示する
    List {
        #[clap(short = 'u', long = "user", help = "Username of the timesheet owner")]
        user: Option<String>,
    },
    /// タイムシートの勤務時間エントリーを表示する
    Entries {
        #[clap(long = "id", help = "Id of the timesheet")]
        id: i64,
    },
}

/// `timesheet`サブコマンドの結果。
#[derive(Debug, PartialEq)]
pub enum TimesheetView {
    Month(Timesheet, Vec<TimeEntry>),
    Timesheets(Vec<Timesheet>),
    Entries(Vec<TimeEntry>),
}

pub struct TimesheetCommand<'a, T: ClockwiseRepository> {
    clockwise_client: &'a T,
    config: &'a Config,
}

impl<'a, T: ClockwiseRepository> TimesheetCommand<'a, T> {
    /// 新しい`TimesheetCommand`を返す。
    pub fn new(clockwise_client: &'a T, config: &'a Config) -> Self {
        Self {
            clockwise_client,
            config,
        }
    }

    /// `timesheet`サブコマンドの処理を行う。
    ///
    /// 月が指定されていない場合は、Localタイムゾーンで現在の月を利用する。
    pub async fn run(&self, args: TimesheetArgs) -> Result<TimesheetView> {
        match args.action {
            TimesheetAction::Show { user, month } => {
                let username = self.config.username(user.as_deref())?;
                let month = month.unwrap_or_else(|| YearMonth::of(datetime::now().date()));
                info!("Timesheet of {} for {}-{:02}", username, month.year, month.month);

                let timesheet = self
                    .clockwise_client
                    .read_timesheet(&username, month.month, month.year)
                    .await
                    .context("Failed to retrieve timesheet")?;
                let entries = self
                    .clockwise_client
                    .read_time_entries(timesheet.id)
                    .await
                    .context("Failed to retrieve time entries")?;

                Ok(TimesheetView::Month(timesheet, entries))
            }
            TimesheetAction::List { user } => {
                let username = self.config.username(user.as_deref())?;
                let timesheets = self
                    .clockwise_client
                    .read_timesheets(&username)
                    .await
                    .context("Failed to retrieve timesheets")?;

                Ok(TimesheetView::Timesheets(timesheets))
            }
            TimesheetAction::Entries { id } => {
                let entries = self
                    .clockwise_client
                    .read_time_entries(id)
                    .await
                    .context("Failed to retrieve time entries")?;

                Ok(TimesheetView::Entries(entries))
            }
        }
    }
}
