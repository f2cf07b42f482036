use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime};

#[cfg(not(test))]
/// Localタイムゾーンでの現在時刻を取得する。
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// テスト時に利用するモック時間を取得する。
#[cfg(test)]
pub mod mock_datetime {
    use std::cell::RefCell;

    use super::Local;
    use super::NaiveDateTime;

    thread_local! {
        static MOCK_TIME: RefCell<Option<NaiveDateTime>> = RefCell::new(None);
    }

    /// モック時間を取得する。
    pub fn now() -> NaiveDateTime {
        MOCK_TIME.with(|cell| {
            cell.borrow()
                .as_ref()
                .cloned()
                .unwrap_or_else(|| Local::now().naive_local())
        })
    }

    /// モック時間を設定する。
    pub fn set_mock_time(time: NaiveDateTime) {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = Some(time));
    }

    // 設定したモック時間をクリアする。
    pub fn clear_mock_time() {
        MOCK_TIME.with(|cell| *cell.borrow_mut() = None);
    }
}

#[cfg(test)]
pub use mock_datetime::now;

/// 日付をパースする。
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Failed to parse date: {}", s))
}

/// `HH:MM`形式の時刻をパースする。
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").with_context(|| format!("Failed to parse time: {}", s))
}

/// 年と月の組。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// 指定した日付を含む月を返す。
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

/// `YYYY-MM`形式の月をパースする。
pub fn parse_month(s: &str) -> Result<YearMonth> {
    let target_date = s.to_string() + "-01";
    let naive_date = NaiveDate::parse_from_str(&target_date, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse month: {}", s))?;

    Ok(YearMonth::of(naive_date))
}

#[cfg(test)]
mod tests {
    use chrono::{Local, NaiveDate, NaiveTime};
    use rstest::rstest;

    use super::{mock_datetime, parse_date, parse_month, parse_time, YearMonth};

    /// 何も設定しない場合は、現在時間が取得できることを確認する。
    ///
    ///  - 現在時刻での比較を行なっているため、1秒以内の差であれば一致とみなしている。
    #[test]
    fn test_now() {
        let expected = Local::now().naive_local();

        assert!((mock_datetime::now() - expected).num_seconds().abs() <= 1);
    }

    /// モック時間を設定した時に、その時間が取得できることを確認する。
    #[test]
    fn test_now_specific_datetime() {
        let datetime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        mock_datetime::set_mock_time(datetime);

        assert_eq!(mock_datetime::now(), datetime);
    }

    /// モック時間をリセットした時に、現在時間が取得できることを確認する。
    #[test]
    fn test_now_after_clear_mock_time() {
        let datetime = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        mock_datetime::set_mock_time(datetime);
        mock_datetime::clear_mock_time();

        let expected = Local::now().naive_local();
        assert!((mock_datetime::now() - expected).num_seconds().abs() <= 1);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-05-06").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
        );
        assert!(parse_date("06.05.2024").is_err());
    }

    #[rstest]
    #[case("08:00", Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))]
    #[case("23:59", Some(NaiveTime::from_hms_opt(23, 59, 0).unwrap()))]
    #[case("24:00", None)]
    #[case("8am", None)]
    fn test_parse_time(#[case] input: &str, #[case] expected: Option<NaiveTime>) {
        assert_eq!(parse_time(input).ok(), expected);
    }

    #[rstest]
    #[case("2024-05", Some(YearMonth { year: 2024, month: 5 }))]
    #[case("2023-12", Some(YearMonth { year: 2023, month: 12 }))]
    #[case("2024-13", None)]
    #[case("2024", None)]
    fn test_parse_month(#[case] input: &str, #[case] expected: Option<YearMonth>) {
        assert_eq!(parse_month(input).ok(), expected);
    }
}
