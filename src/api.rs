use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
#[cfg(test)]
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::entry::{NewTimeEntry, NewVacationEntry, TimeEntry, Timesheet, VacationEntry};

/// Clockwise APIで扱うエントリーとタイムシートへのアクセス。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ClockwiseRepository {
    /// 勤務時間エントリーを作成する。
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry>;

    /// 勤務時間エントリーを更新する。
    async fn update_time_entry(&self, id: i64, entry: &NewTimeEntry) -> Result<TimeEntry>;

    /// 勤務時間エントリーを削除する。
    async fn delete_time_entry(&self, id: i64) -> Result<()>;

    /// タイムシートに含まれる勤務時間エントリーを取得する。
    async fn read_time_entries(&self, timesheet_id: i64) -> Result<Vec<TimeEntry>>;

    /// 休暇エントリーを作成する。
    async fn create_vacation_entry(&self, entry: &NewVacationEntry) -> Result<VacationEntry>;

    /// 休暇エントリーを更新する。
    async fn update_vacation_entry(
        &self,
        id: i64,
        entry: &NewVacationEntry,
    ) -> Result<VacationEntry>;

    /// ユーザーの指定した月のタイムシートを取得する。
    async fn read_timesheet(&self, username: &str, month: u32, year: i32) -> Result<Timesheet>;

    /// ユーザーの全てのタイムシートを取得する。
    async fn read_timesheets(&self, username: &str) -> Result<Vec<Timesheet>>;
}

/// Clockwise APIと通信するためのクライアント。
///
/// # Examples
///
/// ```ignore
/// let config = Config::from_env().unwrap();
/// let client = ClockwiseClient::new(&config);
/// let timesheets = client.read_timesheets("hiwi").await.unwrap();
/// ```
pub struct ClockwiseClient {
    client: Client,
    api_url: String,
    api_token: String,
}

impl ClockwiseClient {
    /// 新しい`ClockwiseClient`を返す。
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_url: config.api_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// 認証情報を付与したリクエストを作成する。
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!("{} {}{}", method, self.api_url, path);
        self.client
            .request(method, format!("{}{}", self.api_url, path))
            .bearer_auth(&self.api_token)
            .header(CONTENT_TYPE, "application/json")
    }

    /// リクエストを送信し、レスポンスのJSONをデシリアライズする。
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let body = request
            .send()
            .await
            .with_context(|| format!("Failed to send request to Clockwise API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<T>()
            .await
            .context("Failed to deserialize response")?;

        Ok(body)
    }
}

#[async_trait]
impl ClockwiseRepository for ClockwiseClient {
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let created: TimeEntry = self
            .send(self.request(Method::POST, "/timeEntries").json(entry))
            .await
            .context("Failed to create time entry")?;
        info!("Created time entry: {}", created.id);

        Ok(created)
    }

    async fn update_time_entry(&self, id: i64, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let updated: TimeEntry = self
            .send(
                self.request(Method::PUT, &format!("/timeEntries/{}", id))
                    .json(entry),
            )
            .await
            .with_context(|| format!("Failed to update time entry: {}", id))?;
        info!("Updated time entry: {}", updated.id);

        Ok(updated)
    }

    async fn delete_time_entry(&self, id: i64) -> Result<()> {
        self.request(Method::DELETE, &format!("/timeEntries/{}", id))
            .send()
            .await
            .with_context(|| format!("Failed to send request to Clockwise API at {}", self.api_url))?
            .error_for_status()
            .with_context(|| format!("Failed to delete time entry: {}", id))?;
        info!("Deleted time entry: {}", id);

        Ok(())
    }

    async fn read_time_entries(&self, timesheet_id: i64) -> Result<Vec<TimeEntry>> {
        let entries: Vec<TimeEntry> = self
            .send(
                self.request(Method::GET, "/timeEntries")
                    .query(&[("timesheetId", timesheet_id)]),
            )
            .await
            .with_context(|| format!("Failed to read time entries of timesheet: {}", timesheet_id))?;
        info!("length of time entries: {}", entries.len());

        Ok(entries)
    }

    async fn create_vacation_entry(&self, entry: &NewVacationEntry) -> Result<VacationEntry> {
        let created: VacationEntry = self
            .send(self.request(Method::POST, "/vacationEntries").json(entry))
            .await
            .context("Failed to create vacation entry")?;
        info!("Created vacation entry: {}", created.id);

        Ok(created)
    }

    async fn update_vacation_entry(
        &self,
        id: i64,
        entry: &NewVacationEntry,
    ) -> Result<VacationEntry> {
        let updated: VacationEntry = self
            .send(
                self.request(Method::PUT, &format!("/vacationEntries/{}", id))
                    .json(entry),
            )
            .await
            .with_context(|| format!("Failed to update vacation entry: {}", id))?;
        info!("Updated vacation entry: {}", updated.id);

        Ok(updated)
    }

    async fn read_timesheet(&self, username: &str, month: u32, year: i32) -> Result<Timesheet> {
        let timesheet: Timesheet = self
            .send(self.request(Method::GET, "/timesheets/month").query(&[
                ("username", username.to_string()),
                ("month", month.to_string()),
                ("year", year.to_string()),
            ]))
            .await
            .with_context(|| {
                format!(
                    "Failed to read timesheet of {} for {}-{:02}",
                    username, year, month
                )
            })?;

        Ok(timesheet)
    }

    async fn read_timesheets(&self, username: &str) -> Result<Vec<Timesheet>> {
        let timesheets: Vec<Timesheet> = self
            .send(
                self.request(Method::GET, "/timesheets")
                    .query(&[("username", username)]),
            )
            .await
            .with_context(|| format!("Failed to read timesheets of {}", username))?;
        info!("length of timesheets: {}", timesheets.len());

        Ok(timesheets)
    }
}
