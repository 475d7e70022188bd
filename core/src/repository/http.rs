use std::time::Duration;

use log::{debug, warn};
use reqwest::header::COOKIE;
use reqwest::{redirect, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::calendar::{JalaliDate, YearMonth};
use crate::config::Config;
use crate::error::FetchError;
use crate::model::report::{CurrentDate, DayReport, LastUpdate, MonthReport};
use crate::repository::traits::ReportSource;

pub const SESSION_COOKIE: &str = "session_token";

const INVALID_CREDENTIALS: &str = "نام کاربری یا رمز عبور اشتباه است";

/// Report source backed by the dashboard server's JSON API.
#[derive(Clone)]
pub struct HttpReportSource {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl HttpReportSource {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_token: config.session_token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn month_url(&self, target: YearMonth) -> String {
        format!("{}/api/month/{}/{}", self.base_url, target.year, target.month)
    }

    pub fn day_url(&self, date: JalaliDate) -> String {
        format!(
            "{}/api/day/{}/{}/{}",
            self.base_url,
            date.year(),
            date.month(),
            date.day()
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        debug!("GET {}", url);
        let mut request = self.client.get(&url);
        if let Some(token) = &self.session_token {
            request = request.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if status == StatusCode::UNAUTHORIZED {
            warn!("{} rejected the session; log in again", url);
        }
        decode_body(status.as_u16(), &body)
    }

    /// Posts the login form and returns the session token the server sets.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, FetchError> {
        // The token arrives on the redirect itself, so it must not be followed.
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;
        let url = format!("{}/login", self.base_url);
        debug!("POST {}", url);

        let response = client
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        session_token(&response)
            .ok_or_else(|| FetchError::Application(INVALID_CREDENTIALS.to_string()))
    }
}

impl ReportSource for HttpReportSource {
    async fn month(&self, target: YearMonth) -> Result<MonthReport, FetchError> {
        let report: MonthReport = self.get_json(self.month_url(target)).await?;
        report.validate()?;
        Ok(report)
    }

    async fn day(&self, date: JalaliDate) -> Result<DayReport, FetchError> {
        let report: DayReport = self.get_json(self.day_url(date)).await?;
        report.validate()?;
        Ok(report)
    }

    async fn last_update(&self) -> Result<LastUpdate, FetchError> {
        self.get_json(format!("{}/api/last-update", self.base_url)).await
    }

    async fn current_date(&self) -> Result<CurrentDate, FetchError> {
        self.get_json(format!("{}/api/current-date", self.base_url)).await
    }
}

/// Decodes an API body. A non-empty `error` field wins over everything else,
/// then non-success statuses, then the payload shape.
pub fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, FetchError> {
    let success = (200..300).contains(&status);
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) if !success => return Err(FetchError::Status(status)),
        Err(err) => return Err(err.into()),
    };

    if let Some(message) = value
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return Err(FetchError::Application(message.to_string()));
    }
    if !success {
        return Err(FetchError::Status(status));
    }

    Ok(serde_json::from_value(value)?)
}

fn session_token(response: &Response) -> Option<String> {
    response
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_string())
}
