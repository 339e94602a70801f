//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::HorizonConfig;
use crate::core::{FetchError, HttpTransport, RawResponse};

/// Production transport over a shared `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport from the `[horizon]` config section
    pub fn new(config: &HorizonConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| FetchError::network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::network(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        debug!("GET {} -> {}", url, status);

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(format!("reading body of {url} failed: {e}")))?;

        Ok(RawResponse::new(
            status.as_u16(),
            status.canonical_reason().unwrap_or(""),
            body.to_vec(),
        ))
    }
}
