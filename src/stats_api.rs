use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::Deserialize;

use crate::error::DashboardError;
use crate::state::StatRecord;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const STATS_PATH: &str = "/api/stats";
const REFRESH_PATH: &str = "/api/refresh";

static CLIENT: OnceCell<Client> = OnceCell::new();

/// The stats service: `GET /api/stats` and `POST /api/refresh`.
pub trait StatsApi {
    fn fetch_stats(&self) -> Result<Vec<StatRecord>, DashboardError>;
    fn trigger_refresh(&self) -> Result<RefreshResponse, DashboardError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RefreshResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "newData", default)]
    pub new_data: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

pub struct HttpStatsApi {
    base_url: String,
}

impl HttpStatsApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_stats_body(&self) -> Result<String> {
        let client = http_client()?;
        let url = format!("{}{STATS_PATH}", self.base_url);
        let resp = client
            .get(&url)
            .header(USER_AGENT, user_agent())
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        read_success_body(resp)
    }

    fn post_refresh_body(&self) -> Result<String> {
        let client = http_client()?;
        let url = format!("{}{REFRESH_PATH}", self.base_url);
        let resp = client
            .post(&url)
            .header(USER_AGENT, user_agent())
            .header(ACCEPT, "application/json")
            .send()
            .context("request failed")?;
        read_success_body(resp)
    }
}

impl StatsApi for HttpStatsApi {
    fn fetch_stats(&self) -> Result<Vec<StatRecord>, DashboardError> {
        let records = self
            .get_stats_body()
            .and_then(|body| parse_stats_json(&body))
            .map_err(DashboardError::fetch)?;
        tracing::info!(count = records.len(), "fetched stats");
        Ok(records)
    }

    fn trigger_refresh(&self) -> Result<RefreshResponse, DashboardError> {
        let response = self
            .post_refresh_body()
            .and_then(|body| parse_refresh_json(&body))
            .map_err(DashboardError::refresh)?;
        tracing::info!(
            success = response.success,
            new_data = response.new_data,
            "refresh answered"
        );
        Ok(response)
    }
}

fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("failed to build http client")
    })
}

fn user_agent() -> String {
    format!("fncs_terminal/{}", env!("CARGO_PKG_VERSION"))
}

fn read_success_body(resp: reqwest::blocking::Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow::anyhow!("http {}: {}", status, body.trim()));
    }
    Ok(body)
}

/// Parses a `/api/stats` body. `null` or an empty body is an empty store;
/// records without a player id are dropped.
pub fn parse_stats_json(raw: &str) -> Result<Vec<StatRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let records: Vec<StatRecord> =
        serde_json::from_str(trimmed).context("invalid stats json")?;
    let total = records.len();
    let records: Vec<StatRecord> = records
        .into_iter()
        .filter(|record| !record.player_id.trim().is_empty())
        .collect();
    if records.len() != total {
        tracing::warn!(dropped = total - records.len(), "stats records without player id");
    }
    Ok(records)
}

pub fn parse_refresh_json(raw: &str) -> Result<RefreshResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Err(anyhow::anyhow!("empty refresh response"));
    }
    serde_json::from_str(trimmed).context("invalid refresh json")
}
