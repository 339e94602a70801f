//! Centralized error types for the explorer

use serde::Serialize;
use thiserror::Error;

/// Failure of a single request or of a whole paginated collection.
///
/// Carries only diagnostic detail, never partially fetched records.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {detail}")]
    Network { detail: String },

    #[error("Decode error: {detail}")]
    Decode { detail: String },

    #[error("Pagination limit of {max_pages} pages exceeded")]
    PaginationLimitExceeded { max_pages: usize },

    #[error("Invalid URL: {detail}")]
    InvalidUrl { detail: String },
}

impl FetchError {
    pub fn network(detail: impl Into<String>) -> Self {
        FetchError::Network { detail: detail.into() }
    }

    pub fn decode(detail: impl Into<String>) -> Self {
        FetchError::Decode { detail: detail.into() }
    }

    pub fn invalid_url(detail: impl Into<String>) -> Self {
        FetchError::InvalidUrl { detail: detail.into() }
    }

    /// HTTP status code, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::decode(err.to_string())
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        FetchError::invalid_url(err.to_string())
    }
}

/// Main explorer error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExplorerError {
    #[error("Invalid wallet address {input:?}: {reason}")]
    InvalidAddress { input: String, reason: String },

    #[error("Wallet not found or not activated: {address}")]
    AccountNotFound { address: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for explorer operations
pub type ExplorerResult<T> = Result<T, ExplorerError>;
