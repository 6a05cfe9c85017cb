// src/error.rs
use thiserror::Error;

/// Failures surfaced by the Jobs API and scraper service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Parse(String),
}

impl ViewError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Parse failures are shown the same way as transport failures.
    pub fn is_network_like(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
