//! Cursor-following collection fetch
//!
//! The first request is built from a path and query; every later request
//! uses the `next` cursor of the page before it verbatim. Collection ends
//! when a page has no cursor or no records, and fails with
//! [`FetchError::PaginationLimitExceeded`] once the page cap is hit while
//! the server still advertises more.

use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::client::LedgerApiClient;
use crate::config::PaginationConfig;
use crate::core::{FetchError, LedgerRecord, Page};

/// Sort order requested for every collection (newest first)
pub const ORDER_DESC: &str = "desc";

#[derive(Clone)]
pub struct PaginatedCollector {
    client: Arc<LedgerApiClient>,
    max_pages: Option<usize>,
}

impl PaginatedCollector {
    pub fn new(client: Arc<LedgerApiClient>, max_pages: Option<usize>) -> Self {
        Self { client, max_pages }
    }

    pub fn from_config(client: Arc<LedgerApiClient>, config: &PaginationConfig) -> Self {
        Self::new(client, config.page_cap())
    }

    pub fn max_pages(&self) -> Option<usize> {
        self.max_pages
    }

    /// URL of the first page: the caller's query, then `limit` and `order`
    pub fn first_url(&self, path: &str, query: &[(&str, String)], page_size: u32) -> Result<Url, FetchError> {
        let mut params: Vec<(&str, String)> = query.to_vec();
        params.push(("limit", page_size.to_string()));
        params.push(("order", ORDER_DESC.to_string()));
        self.client.endpoint(path, &params)
    }

    /// Fetch a single page: the first one, or the one `cursor` names
    pub async fn page(
        &self,
        path: &str,
        query: &[(&str, String)],
        page_size: u32,
        cursor: Option<&Url>,
    ) -> Result<Page, FetchError> {
        match cursor {
            Some(url) => self.client.fetch_page(url).await,
            None => {
                let url = self.first_url(path, query, page_size)?;
                self.client.fetch_page(&url).await
            }
        }
    }

    /// Fetch every page of `path` and return the records in server order.
    ///
    /// Any page failure discards what was accumulated and returns that failure.
    pub async fn collect_all(
        &self,
        path: &str,
        query: &[(&str, String)],
        page_size: u32,
    ) -> Result<Vec<LedgerRecord>, FetchError> {
        let mut url = self.first_url(path, query, page_size)?;
        let mut records = Vec::new();
        let mut pages = 0usize;

        loop {
            let page = self.client.fetch_page(&url).await?;
            pages += 1;

            let received = page.records.len();
            records.extend(page.records);
            debug!("{}: page {} carried {} records ({} total)", path, pages, received, records.len());

            // Horizon keeps linking a `next` page past the end, so an empty page is the
            // stop even when it carries a cursor. Such a cursor is never followed, including
            // one on an empty page in the middle of a collection.
            let next = match page.next {
                Some(next) if received > 0 => next,
                _ => break,
            };

            if let Some(max_pages) = self.max_pages {
                if pages >= max_pages {
                    debug!("{}: stopping after {} pages, server still links {}", path, pages, next);
                    return Err(FetchError::PaginationLimitExceeded { max_pages });
                }
            }

            url = next;
        }

        Ok(records)
    }
}
