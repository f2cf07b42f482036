use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use clockwise::api::ClockwiseClient;
use clockwise::config::Config;
use clockwise::console::{ConsoleMarkdownList, ConsolePresenter};
use clockwise::logger;
use clockwise::timesheet_command::{TimesheetArgs, TimesheetCommand, TimesheetView};
use clockwise::vacation_command::{VacationArgs, VacationCommand, VacationOutcome};
use clockwise::validate_command::{validate_command, ValidateArgs};
use clockwise::validation::{Outcome, ValidationResult};
use clockwise::work_command::{WorkArgs, WorkCommand, WorkOutcome};

/// Clockwiseのタイムシートを操作するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- work add -a Tutoring -p Algorithms -d 2024-05-14 -s 08:00 -e 12:00 -b 15
/// $ cargo run -- timesheet show --month 2024-05
/// $ cargo run -- validate work -s 08:00 -e 17:00 --json
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(short = 'v', long = "verbose", global = true, help = "Show debug logs")]
    verbose: bool,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// 勤務時間エントリーを追加・更新・削除する
    Work(WorkArgs),
    /// 休暇エントリーを追加・更新する
    Vacation(VacationArgs),
    /// タイムシートを表示する
    Timesheet(TimesheetArgs),
    /// 送信せずにエントリーを検証する
    Validate(ValidateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logger::init(args.verbose)?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    let mut presenter = ConsoleMarkdownList::new(&mut writer);

    match args.subcommand {
        SubCommands::Work(work) => {
            let config = load_config()?;
            let client = ClockwiseClient::new(&config);
            match WorkCommand::new(&client, &config).run(work).await? {
                WorkOutcome::Saved(entry) => presenter.show_time_entries(&[entry])?,
                WorkOutcome::Deleted(id) => info!("Time entry {} deleted.", id),
                WorkOutcome::Rejected(result) => reject(&mut presenter, &result)?,
            }
        }
        SubCommands::Vacation(vacation) => {
            let config = load_config()?;
            let client = ClockwiseClient::new(&config);
            match VacationCommand::new(&client, &config).run(vacation).await? {
                VacationOutcome::Saved(entry) => info!(
                    "Vacation entry {} saved to timesheet {}: {} ({} minutes)",
                    entry.id, entry.timesheet_id, entry.date, entry.duration_minutes
                ),
                VacationOutcome::Rejected(result) => reject(&mut presenter, &result)?,
            }
        }
        SubCommands::Timesheet(timesheet) => {
            let config = load_config()?;
            let client = ClockwiseClient::new(&config);
            match TimesheetCommand::new(&client, &config).run(timesheet).await? {
                TimesheetView::Month(timesheet, entries) => {
                    presenter.show_timesheets(&[timesheet])?;
                    presenter.show_time_entries(&entries)?;
                }
                TimesheetView::Timesheets(timesheets) => presenter.show_timesheets(&timesheets)?,
                TimesheetView::Entries(entries) => presenter.show_time_entries(&entries)?,
            }
        }
        SubCommands::Validate(validate) => {
            let result = validate_command(&validate);
            if validate.json {
                let json = serde_json::to_string_pretty(&result)
                    .context("Failed to serialize validation result")?;
                println!("{}", json);
            } else {
                presenter.show_validation_result(&result)?;
            }
        }
    }

    writer.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn load_config() -> Result<Config> {
    Config::from_env().context("Failed to load configuration")
}

/// 検証で拒否された結果を表示し、エラーとして終了する。
fn reject<P: ConsolePresenter>(presenter: &mut P, result: &ValidationResult) -> Result<()> {
    presenter.show_validation_result(result)?;
    match result.outcome() {
        Outcome::SoftWarning => bail!("Entry was not submitted; confirm with --confirm-overtime"),
        _ => bail!("Entry was rejected by validation"),
    }
}
