//! Horizon REST client
//!
//! Builds request URLs against a configurable base, maps transport and
//! status failures onto [`FetchError`] and decodes the account snapshot and
//! collection envelopes. No retries: one failed request fails the call.

#[cfg(feature = "mock-transport")]
pub mod mock;
pub mod transport;

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::address::AccountId;
use crate::config::HorizonConfig;
use crate::core::{AccountSnapshot, FetchError, HttpTransport, LedgerRecord, Page};

pub use transport::ReqwestTransport;

/// Collection envelope: `_embedded.records` plus `_links.next.href`
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded>,
    #[serde(rename = "_links")]
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct Embedded {
    #[serde(default)]
    records: Vec<LedgerRecord>,
}

#[derive(Debug, Deserialize)]
struct Links {
    next: Option<Link>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: Option<String>,
}

/// Read-only client for one Horizon instance
#[derive(Clone)]
pub struct LedgerApiClient {
    base_url: Url,
    /// `base_url` with a trailing slash, so relative cursors keep any path prefix
    cursor_base: Url,
    transport: Arc<dyn HttpTransport>,
}

impl LedgerApiClient {
    /// Create a client over the production transport
    pub fn new(config: &HorizonConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(config)?;
        Self::with_transport(&config.base_url, Arc::new(transport))
    }

    /// Create a client over any transport
    pub fn with_transport(base_url: &str, transport: Arc<dyn HttpTransport>) -> Result<Self, FetchError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::invalid_url(format!("{base_url} cannot be used as a base URL")));
        }
        let mut cursor_base = base_url.clone();
        if !cursor_base.path().ends_with('/') {
            let prefixed = format!("{}/", cursor_base.path());
            cursor_base.set_path(&prefixed);
        }
        info!("Horizon client targeting {}", base_url);
        Ok(Self {
            base_url,
            cursor_base,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Full URL for `path` with `query` appended in order
    pub fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, FetchError> {
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// GET `path` with `query` and decode the JSON body
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        let url = self.endpoint(path, query)?;
        self.get_url(&url).await
    }

    /// GET an already-built URL, such as a pagination cursor
    pub async fn get_url(&self, url: &Url) -> Result<Value, FetchError> {
        debug!("GET {}", url);
        let response = self.transport.get(url).await?;

        if !response.is_success() {
            debug!("GET {} failed with {} {}", url, response.status, response.status_text);
            return Err(FetchError::Http {
                status: response.status,
                status_text: response.status_text,
            });
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| FetchError::decode(format!("invalid JSON from {url}: {e}")))
    }

    /// Fetch the account snapshot; `Ok(None)` when the account does not exist
    pub async fn fetch_account(&self, account: &AccountId) -> Result<Option<AccountSnapshot>, FetchError> {
        let path = format!("/accounts/{account}");
        match self.get(&path, &[]).await {
            Ok(body) => {
                let snapshot = serde_json::from_value(body).map_err(|e| {
                    FetchError::decode(format!("unexpected account snapshot for {account}: {e}"))
                })?;
                Ok(Some(snapshot))
            }
            Err(e) if e.is_not_found() => {
                info!("Account {} not found", account);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch and decode exactly one collection page
    pub async fn fetch_page(&self, url: &Url) -> Result<Page, FetchError> {
        let body = self.get_url(url).await?;
        self.decode_page(body)
    }

    fn decode_page(&self, body: Value) -> Result<Page, FetchError> {
        let envelope: Envelope = serde_json::from_value(body)
            .map_err(|e| FetchError::decode(format!("unexpected collection envelope: {e}")))?;

        let records = envelope.embedded.map(|e| e.records).unwrap_or_default();
        let next = envelope
            .links
            .and_then(|l| l.next)
            .and_then(|n| n.href)
            .filter(|href| !href.trim().is_empty())
            .map(|href| self.cursor_base.join(&href))
            .transpose()?;

        Ok(Page { records, next })
    }
}
