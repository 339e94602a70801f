//! Core trait abstractions (ports)

use async_trait::async_trait;
use url::Url;

use super::error::FetchError;

/// Undecoded HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, status_text: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            status_text: status_text.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport port - issues one JSON GET request.
///
/// Implementations return `Err` only for transport-level failures; any
/// status the server answers with comes back as a `RawResponse`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError>;
}
