use thiserror::Error;

/// Failures surfaced to the user as a transient notification.
///
/// `FetchStats` and `RefreshRequest` are network failures (request rejected,
/// transport error, non-2xx status or an unreadable body). `RefreshRejected`
/// is an application failure: the refresh endpoint answered `success: false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("Error fetching stats: {0}")]
    FetchStats(String),
    #[error("Error during refresh: {0}")]
    RefreshRequest(String),
    #[error("Refresh failed: {0}")]
    RefreshRejected(String),
}

impl DashboardError {
    pub fn fetch(err: anyhow::Error) -> Self {
        Self::FetchStats(format!("{err:#}"))
    }

    pub fn refresh(err: anyhow::Error) -> Self {
        Self::RefreshRequest(format!("{err:#}"))
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::FetchStats(_) | Self::RefreshRequest(_))
    }
}
