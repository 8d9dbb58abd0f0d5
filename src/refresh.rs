use std::time::{Duration, Instant};

use chrono::{DateTime, Local, NaiveDateTime};

use crate::error::DashboardError;
use crate::state::StatRecord;
use crate::stats_api::StatsApi;

pub const REFRESH_LABEL: &str = "Refresh Data";
pub const REFRESH_BUSY_LABEL: &str = "Refreshing...";
pub const NOTICE_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

impl RefreshState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => REFRESH_LABEL,
            Self::Refreshing => REFRESH_BUSY_LABEL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Unchanged { timestamp: Option<String> },
    Replaced {
        timestamp: Option<String>,
        records: Vec<StatRecord>,
    },
    /// `timestamp` is set when the refresh itself succeeded and only the
    /// follow-up fetch failed.
    Failed {
        error: DashboardError,
        timestamp: Option<String>,
    },
}

impl RefreshOutcome {
    pub fn failed(error: DashboardError) -> Self {
        Self::Failed {
            error,
            timestamp: None,
        }
    }
}

/// Triggers the server refresh, then re-fetches if it reports new data.
pub fn run_refresh(api: &dyn StatsApi) -> RefreshOutcome {
    let response = match api.trigger_refresh() {
        Ok(response) => response,
        Err(error) => return RefreshOutcome::failed(error),
    };
    if !response.success {
        let reason = response
            .error
            .filter(|e| !e.trim().is_empty())
            .unwrap_or_else(|| "unknown error".to_string());
        return RefreshOutcome::failed(DashboardError::RefreshRejected(reason));
    }
    if let Some(message) = response.message.as_deref() {
        tracing::debug!(message, "refresh acknowledged");
    }
    if !response.new_data {
        return RefreshOutcome::Unchanged {
            timestamp: response.timestamp,
        };
    }
    match api.fetch_stats() {
        Ok(records) => RefreshOutcome::Replaced {
            timestamp: response.timestamp,
            records,
        },
        Err(error) => RefreshOutcome::Failed {
            error,
            timestamp: response.timestamp,
        },
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            shown_at: now,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= Duration::from_secs(NOTICE_SECS)
    }
}

/// Header text for the last successful refresh. ISO-8601 timestamps are
/// shown in local time; anything unparseable is shown as received.
pub fn format_update_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Local::now().format(DISPLAY_FORMAT).to_string();
    };
    match parse_timestamp(raw) {
        Some(local) => local.format(DISPLAY_FORMAT).to_string(),
        None => raw.to_string(),
    }
}

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            // Naive timestamps are the server's wall clock; show them as-is.
            return naive.and_local_timezone(Local).earliest();
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_iso_timestamp_keeps_wall_clock() {
        assert_eq!(
            format_update_time(Some("2024-05-01T12:30:00.123456")),
            "2024-05-01 12:30:00"
        );
    }

    #[test]
    fn offset_timestamp_is_converted_to_local_time() {
        let raw = "2024-05-01T12:30:00+02:00";
        let expected = DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string())
            .unwrap();
        assert_eq!(format_update_time(Some(raw)), expected);

        let utc = format_update_time(Some("2024-05-01T10:30:00Z"));
        assert_eq!(utc, expected);
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        assert_eq!(format_update_time(Some("yesterday")), "yesterday");
    }

    #[test]
    fn notification_expires_after_five_seconds() {
        let start = Instant::now();
        let notice = Notification::new("boom", start);
        assert!(!notice.is_expired(start + Duration::from_secs(4)));
        assert!(notice.is_expired(start + Duration::from_secs(5)));
    }
}
