use std::time::Duration;

/// Coarse failure classes. None of them stop the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Protocol,
    MissingMountPoint,
    Render,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timed out after {timeout:?}")]
    TimedOut { timeout: Duration },

    #[error("Backend returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed area list from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mount point '{id}' is missing")]
    MissingMountPoint { id: String },

    #[error("Failed to render area cards: {source}")]
    Render {
        #[from]
        source: askama::Error,
    },
}

impl DashboardError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DashboardError::Network { .. } | DashboardError::TimedOut { .. } => FailureKind::Network,
            DashboardError::Status { .. } | DashboardError::Malformed { .. } => FailureKind::Protocol,
            DashboardError::MissingMountPoint { .. } => FailureKind::MissingMountPoint,
            DashboardError::Render { .. } => FailureKind::Render,
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
