use std::fmt;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::duration::parse_duration;

/// 勤務時間エントリーの入力途中の値。
///
/// 値が未入力の場合は`None`もしくは空文字列となる。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeEntryDraft {
    pub activity: String,
    pub project: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub break_minutes: Option<i64>,
}

impl TimeEntryDraft {
    /// 開始時刻から終了時刻までの分数を返す。
    ///
    /// 日付をまたぐことは想定しないため、終了時刻が開始時刻より前の場合は負の値となる。
    pub fn work_span_minutes(&self) -> Option<i64> {
        let date = self.date?;
        let start = date.and_time(self.start_time?);
        let end = date.and_time(self.end_time?);
        Some(span_minutes(start, end))
    }
}

/// 休暇エントリーの入力途中の値。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VacationEntryDraft {
    pub date: Option<NaiveDate>,
    pub duration: String,
}

/// 保存済みの勤務時間エントリー。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: i64,
    pub timesheet_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i64,
    pub activity: String,
    pub project: String,
}

impl TimeEntry {
    /// 休憩時間を除いた勤務時間を分で返す。
    pub fn work_minutes(&self) -> i64 {
        let start = self.date.and_time(self.start_time);
        let end = self.date.and_time(self.end_time);
        span_minutes(start, end) - self.break_minutes
    }
}

/// 保存済みの休暇エントリー。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationEntry {
    pub id: i64,
    pub timesheet_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

/// タイムシートの承認状況。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimesheetStatus {
    NotSubmitted,
    Submitted,
    Confirmed,
    Revision,
    Accepted,
}

impl fmt::Display for TimesheetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TimesheetStatus::NotSubmitted => "not submitted",
            TimesheetStatus::Submitted => "submitted",
            TimesheetStatus::Confirmed => "confirmed",
            TimesheetStatus::Revision => "revision",
            TimesheetStatus::Accepted => "accepted",
        };
        f.write_str(label)
    }
}

/// 月ごとのタイムシート。
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: i64,
    pub username: String,
    pub month: u32,
    pub year: i32,
    pub status: TimesheetStatus,
    pub hours_due: f64,
    pub hours_worked: f64,
}

/// 勤務時間エントリーの作成・更新リクエスト。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimeEntry {
    pub timesheet_id: i64,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: i64,
    pub activity: String,
    pub project: String,
}

impl NewTimeEntry {
    /// 検証済みのドラフトからリクエストを作成する。
    pub fn from_draft(timesheet_id: i64, draft: &TimeEntryDraft) -> Result<Self> {
        Ok(Self {
            timesheet_id,
            date: draft.date.context("Date is missing")?,
            start_time: draft.start_time.context("Start time is missing")?,
            end_time: draft.end_time.context("End time is missing")?,
            break_minutes: draft.break_minutes.unwrap_or_default(),
            activity: draft.activity.clone(),
            project: draft.project.clone(),
        })
    }
}

/// 休暇エントリーの作成・更新リクエスト。
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVacationEntry {
    pub timesheet_id: i64,
    pub date: NaiveDate,
    pub duration_minutes: i64,
}

impl NewVacationEntry {
    /// 検証済みのドラフトからリクエストを作成する。
    pub fn from_draft(timesheet_id: i64, draft: &VacationEntryDraft) -> Result<Self> {
        Ok(Self {
            timesheet_id,
            date: draft.date.context("Date is missing")?,
            duration_minutes: parse_duration(&draft.duration)
                .context("Failed to parse vacation duration")?,
        })
    }
}

fn span_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes()
}
