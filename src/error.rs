//! Error types for the monthly playlist generator

use reqwest::StatusCode;
use thiserror::Error;

/// Every way a run can fail. All variants are fatal to the run and no
/// playlist is produced once one of them is returned.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonthFormat(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Missing ListenBrainz username, set PLGEN_LB_USERNAME or pass --user")]
    MissingUsername,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch listens: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Listens request to {url} failed with status {status}")]
    Status { status: StatusCode, url: String },

    #[error("Failed to decode listens page: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode playlist: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cancelled before the month was fully fetched")]
    Cancelled,

    #[error("Listen history collection already failed")]
    CollectionFailed,
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure happened while talking to the listens endpoint.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Status { .. })
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
