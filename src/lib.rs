//! Clockwiseのタイムシートサービスを操作するためのクライアント。
//!
//! 勤務時間エントリーと休暇エントリーは送信前に[`validation`]で検証する。

pub mod api;
pub mod config;
pub mod console;
pub mod datetime;
pub mod duration;
pub mod entry;
pub mod logger;
pub mod timesheet_command;
pub mod vacation_command;
pub mod validate_command;
pub mod validation;
pub mod work_command;
