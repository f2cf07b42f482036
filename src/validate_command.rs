use crate::datetime;
use crate::vacation_command::VacationEntryArgs;
use crate::validation::{validate_vacation_entry, ValidationResult};
use crate::work_command::WorkEntryArgs;

/// `validate`サブコマンドの引数。
///
/// 送信は行わず、入力値の検証結果だけを表示する。
#[derive(Debug, clap::Args)]
pub struct ValidateArgs {
    #[clap(long = "json", global = true, help = "Print the result as JSON")]
    pub json: bool,

    #[clap(subcommand)]
    target: ValidateTarget,
}

#[derive(Debug, clap::Subcommand)]
enum ValidateTarget {
    /// 勤務時間エントリーを検証する
    Work(WorkEntryArgs),
    /// 休暇エントリーを検証する
    Vacation(VacationEntryArgs),
}

/// `validate`サブコマンドの処理を行う。
pub fn validate_command(args: &ValidateArgs) -> ValidationResult {
    match &args.target {
        ValidateTarget::Work(entry) => entry
            .rules()
            .validate_work_entry(&entry.draft(), datetime::now()),
        ValidateTarget::Vacation(entry) => validate_vacation_entry(&entry.draft()),
    }
}
