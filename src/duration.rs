use anyhow::{bail, Context, Result};

/// `HH:MM`形式の時間の長さを分に変換する。
///
/// # Arguments
///
/// * `s` - `08:00`のような時間の長さを表す文字列
pub fn parse_duration(s: &str) -> Result<i64> {
    let (hours, minutes) = s
        .trim()
        .split_once(':')
        .with_context(|| format!("Duration must be in the format HH:MM: {}", s))?;
    let hours: i64 = hours
        .parse()
        .with_context(|| format!("Failed to parse hours: {}", s))?;
    let minutes: i64 = minutes
        .parse()
        .with_context(|| format!("Failed to parse minutes: {}", s))?;
    if hours < 0 || !(0..60).contains(&minutes) {
        bail!("Duration out of range: {}", s);
    }

    Ok(hours * 60 + minutes)
}

/// 分を`H:MM`形式で表示するための文字列に変換する。
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.abs();
    format!("{}{}:{:02}", sign, abs / 60, abs % 60)
}
