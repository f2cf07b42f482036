use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use log::debug;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Clockwise APIと通信するための設定。
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub api_token: String,
    pub username: Option<String>,
}

impl Config {
    /// 環境変数から設定を読み込む。
    ///
    /// `CLOCKWISE_API_TOKEN`が設定されていない場合は、設定ディレクトリの`clockwise/token`を読み込む。
    /// どちらも存在しない場合はエラーを返す。
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_token_file(token_file_path().as_deref())
    }

    /// 環境変数と指定したトークンファイルから設定を読み込む。
    pub fn from_env_with_token_file(token_file: Option<&Path>) -> Result<Self> {
        let api_url = env::var("CLOCKWISE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_token = match env::var("CLOCKWISE_API_TOKEN") {
            Ok(token) => token,
            Err(_) => {
                let path = token_file.context(
                    "CLOCKWISE_API_TOKEN must be set when no config directory is available",
                )?;
                debug!("Reading API token from {}", path.display());
                read_token_file(path)?
            }
        };
        let username = env::var("CLOCKWISE_USERNAME").ok();

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token,
            username,
        })
    }

    /// 対象のユーザー名を返す。
    ///
    /// 引数で指定された場合はそれを優先し、そうでなければ`CLOCKWISE_USERNAME`を利用する。
    pub fn username(&self, user: Option<&str>) -> Result<String> {
        user.map(str::to_string)
            .or_else(|| self.username.clone())
            .context("CLOCKWISE_USERNAME must be set or --user given")
    }
}

/// トークンファイルの既定のパスを返す。
fn token_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("clockwise").join("token"))
}

/// トークンファイルの先頭行を読み込む。
fn read_token_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).with_context(|| {
        format!(
            "CLOCKWISE_API_TOKEN is not set and failed to read token file: {}",
            path.display()
        )
    })?;
    let token = content
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .with_context(|| format!("Token file is empty: {}", path.display()))?;

    Ok(token.to_string())
}
