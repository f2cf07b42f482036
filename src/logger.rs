use std::{env, io};

use anyhow::{Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// ロガーを初期化する。
///
/// ログは標準エラー出力に書き出す。標準出力は結果の表示に利用する。
///
/// # Arguments
///
/// * `verbose` - `true`の場合はdebugレベルまで出力する
pub fn init(verbose: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue);
    let level = level_filter(verbose, env::var("CLOCKWISE_LOG").ok().as_deref());

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                record.target(),
                message
            ))
        })
        .level(level)
        // 依存クレートのログは警告以上のみ出力する
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .chain(io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}

/// 出力するログレベルを決定する。
///
/// `CLOCKWISE_LOG`に有効なレベルが指定されている場合はそれを優先する。
fn level_filter(verbose: bool, env_level: Option<&str>) -> LevelFilter {
    env_level
        .and_then(|level| level.parse().ok())
        .unwrap_or(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
}
