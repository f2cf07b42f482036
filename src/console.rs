use std::io::Write;

use anyhow::{Context, Result};

use crate::duration::format_minutes;
use crate::entry::{TimeEntry, Timesheet};
use crate::validation::{Severity, ValidationResult};

/// Consoleにエントリーやタイムシートを表示するためのtrait。
pub trait ConsolePresenter {
    /// 勤務時間エントリーを表示する。
    ///
    /// # Arguments
    ///
    /// * `time_entries` - 表示する勤務時間エントリー
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()>;

    /// タイムシートを表示する。
    fn show_timesheets(&mut self, timesheets: &[Timesheet]) -> Result<()>;

    /// 検証結果を表示する。
    fn show_validation_result(&mut self, result: &ValidationResult) -> Result<()>;
}

/// Markdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    // 日付と開始時刻の順に並べて表示する。
    fn show_time_entries(&mut self, time_entries: &[TimeEntry]) -> Result<()> {
        let mut sorted_entries = time_entries.to_vec();
        sorted_entries.sort_by_key(|entry| (entry.date, entry.start_time));

        for entry in sorted_entries {
            writeln!(
                self.writer,
                "- {} {} ~ {} (break {}, worked {}): {} [{}]",
                entry.date,
                entry.start_time.format("%H:%M"),
                entry.end_time.format("%H:%M"),
                format_minutes(entry.break_minutes),
                format_minutes(entry.work_minutes()),
                entry.activity,
                entry.project
            )
            .with_context(|| format!("Failed to write time entry: {:?}", entry))?;
        }

        Ok(())
    }

    fn show_timesheets(&mut self, timesheets: &[Timesheet]) -> Result<()> {
        let mut sorted = timesheets.to_vec();
        sorted.sort_by_key(|timesheet| (timesheet.year, timesheet.month));

        for timesheet in sorted {
            writeln!(
                self.writer,
                "- {}-{:02} #{} {} ({}): {:.2} / {:.2} h",
                timesheet.year,
                timesheet.month,
                timesheet.id,
                timesheet.username,
                timesheet.status,
                timesheet.hours_worked,
                timesheet.hours_due
            )
            .with_context(|| format!("Failed to write timesheet: {:?}", timesheet))?;
        }

        Ok(())
    }

    fn show_validation_result(&mut self, result: &ValidationResult) -> Result<()> {
        if result.is_valid() {
            writeln!(self.writer, "- valid").context("Failed to write validation result")?;
            return Ok(());
        }

        for violation in &result.violations {
            let level = match violation.field.severity() {
                Severity::Hard => "error",
                Severity::Soft => "warning",
            };
            writeln!(
                self.writer,
                "- {} {}: {}",
                level,
                violation.field.as_str(),
                violation.message
            )
            .with_context(|| format!("Failed to write violation: {:?}", violation))?;
        }

        Ok(())
    }
}
