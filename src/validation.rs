//! 勤務時間エントリーと休暇エントリーの入力検証。
//!
//! 検証は副作用を持たない。現在時刻は呼び出し側から渡す。

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::entry::{TimeEntryDraft, VacationEntryDraft};

/// 違反の種類。JSONでは`field`として出力する。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    MissingFields,
    NegativeWorkTime,
    MaxWorkTime,
    WorkTimeSpan,
    BreakExceedsWorkTime,
    NegativeBreak,
    MinimumBreak,
    FutureDate,
}

/// 違反の重大度。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    /// 送信できない。
    Hard,
    /// 明示的に確認すれば送信できる。
    Soft,
}

impl ViolationKind {
    /// JSONの`field`と同じ名前を返す。
    pub fn as_str(self) -> &'static str {
        match self {
            ViolationKind::MissingFields => "missingFields",
            ViolationKind::NegativeWorkTime => "negativeWorkTime",
            ViolationKind::MaxWorkTime => "maxWorkTime",
            ViolationKind::WorkTimeSpan => "workTimeSpan",
            ViolationKind::BreakExceedsWorkTime => "breakExceedsWorkTime",
            ViolationKind::NegativeBreak => "negativeBreak",
            ViolationKind::MinimumBreak => "minimumBreak",
            ViolationKind::FutureDate => "futureDate",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ViolationKind::WorkTimeSpan => Severity::Soft,
            _ => Severity::Hard,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: ViolationKind,
    pub message: String,
}

impl Violation {
    pub fn new(field: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// 検証結果の分類。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Valid,
    SoftWarning,
    HardFailure,
}

/// 検証結果。`valid`が`true`の場合`violations`は空となる。
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            valid: true,
            violations: vec![],
        }
    }

    pub fn invalid(violation: Violation) -> Self {
        Self {
            valid: false,
            violations: vec![violation],
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// 結果を分類する。ハードな違反が一つでもあれば`HardFailure`となる。
    pub fn outcome(&self) -> Outcome {
        if self.valid {
            Outcome::Valid
        } else if self
            .violations
            .iter()
            .all(|violation| violation.field.severity() == Severity::Soft)
        {
            Outcome::SoftWarning
        } else {
            Outcome::HardFailure
        }
    }
}

/// 勤務時間の上限と休憩のルール。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkTimeRules {
    /// 1日の勤務時間の上限(分)。
    pub max_work_minutes: i64,
    /// 推奨される勤務時間の上限(分)。超えた場合は警告となる。
    pub recommended_work_minutes: Option<i64>,
    /// この時間を超えて働く場合は休憩が必要となる(分)。
    pub break_required_after_minutes: i64,
    pub minimum_break_minutes: i64,
    /// 休憩時間`0`を未入力として扱う。
    pub zero_break_is_missing: bool,
}

impl Default for WorkTimeRules {
    fn default() -> Self {
        Self {
            max_work_minutes: 600,
            recommended_work_minutes: Some(480),
            break_required_after_minutes: 360,
            minimum_break_minutes: 30,
            zero_break_is_missing: true,
        }
    }
}

impl WorkTimeRules {
    /// 推奨上限を超えることを確認済みとして、その警告を出さないルールを返す。
    pub fn with_confirmed_overtime(self) -> Self {
        Self {
            recommended_work_minutes: None,
            ..self
        }
    }

    /// 休憩時間`0`を有効な値として扱うルールを返す。
    pub fn with_zero_break_allowed(self) -> Self {
        Self {
            zero_break_is_missing: false,
            ..self
        }
    }

    /// 勤務時間エントリーを検証する。
    ///
    /// 最初に見つかった違反だけを返す。未入力の項目はまとめて一つの違反として返す。
    ///
    /// # Arguments
    ///
    /// * `draft` - 検証するエントリー
    /// * `now` - 現在時刻。未来の日付の判定に利用する
    pub fn validate_work_entry(
        &self,
        draft: &TimeEntryDraft,
        now: NaiveDateTime,
    ) -> ValidationResult {
        let missing = self.missing_work_fields(draft);
        let (Some(date), Some(break_minutes), Some(span)) =
            (draft.date, draft.break_minutes, draft.work_span_minutes())
        else {
            return incomplete(&missing);
        };
        if !missing.is_empty() {
            return incomplete(&missing);
        }

        if span < 0 {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::NegativeWorkTime,
                "Working time can't be negative.",
            ));
        }
        if span > self.max_work_minutes {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::MaxWorkTime,
                format!(
                    "Working time can't exceed {} hours.",
                    self.max_work_minutes / 60
                ),
            ));
        }
        if let Some(recommended) = self.recommended_work_minutes {
            if span > recommended {
                return ValidationResult::invalid(Violation::new(
                    ViolationKind::WorkTimeSpan,
                    format!(
                        "Working time exceeds the recommended {} hours.",
                        recommended / 60
                    ),
                ));
            }
        }
        if break_minutes > span {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::BreakExceedsWorkTime,
                "Break time can't exceed working time.",
            ));
        }
        if break_minutes < 0 {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::NegativeBreak,
                "Break time can't be negative.",
            ));
        }
        if span > self.break_required_after_minutes && break_minutes < self.minimum_break_minutes {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::MinimumBreak,
                format!(
                    "A minimum break of {} minutes is required for more than {} hours of work.",
                    self.minimum_break_minutes,
                    self.break_required_after_minutes / 60
                ),
            ));
        }
        if date.and_hms_opt(0, 0, 0).map_or(false, |midnight| midnight > now) {
            return ValidationResult::invalid(Violation::new(
                ViolationKind::FutureDate,
                "Date can't be in the future.",
            ));
        }

        ValidationResult::valid()
    }

    fn missing_work_fields(&self, draft: &TimeEntryDraft) -> Vec<&'static str> {
        let break_missing = match draft.break_minutes {
            None => true,
            Some(0) => self.zero_break_is_missing,
            Some(_) => false,
        };

        [
            ("activity", draft.activity.is_empty()),
            ("project", draft.project.is_empty()),
            ("date", draft.date.is_none()),
            ("start time", draft.start_time.is_none()),
            ("end time", draft.end_time.is_none()),
            ("break time", break_missing),
        ]
        .into_iter()
        .filter(|(_, missing)| *missing)
        .map(|(name, _)| name)
        .collect()
    }
}

/// 既定のルールで勤務時間エントリーを検証する。
pub fn validate_work_entry(draft: &TimeEntryDraft, now: NaiveDateTime) -> ValidationResult {
    WorkTimeRules::default().validate_work_entry(draft, now)
}

/// 休暇エントリーを検証する。
///
/// 日付と時間の長さが入力されていることだけを確認する。
pub fn validate_vacation_entry(draft: &VacationEntryDraft) -> ValidationResult {
    let mut missing = vec![];
    if draft.date.is_none() {
        missing.push("date");
    }
    if draft.duration.is_empty() {
        missing.push("duration");
    }
    if !missing.is_empty() {
        return incomplete(&missing);
    }

    ValidationResult::valid()
}

fn incomplete(missing: &[&str]) -> ValidationResult {
    ValidationResult::invalid(Violation::new(
        ViolationKind::MissingFields,
        format!("Please fill in all fields: {}", missing.join(", ")),
    ))
}
