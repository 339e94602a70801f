//! Scripted in-memory transport for tests and offline development
//!
//! Routes are keyed by path plus query (`/accounts/G.../payments?limit=10&order=desc`),
//! so the same script works whatever host the client was configured with.
//! Every request is recorded in arrival order.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use url::{Position, Url};

use crate::core::{FetchError, HttpTransport, RawResponse};

enum Reply {
    Respond(RawResponse),
    Fail(FetchError),
}

/// Transport answering from a fixed route table
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `route` with `status` and a JSON body
    pub fn respond_json(&self, route: &str, status: u16, body: Value) -> &Self {
        let text = status_text(status);
        self.insert(route, Reply::Respond(RawResponse::new(status, text, body.to_string())));
        self
    }

    /// Answer `route` with `status` and an arbitrary body
    pub fn respond_raw(&self, route: &str, status: u16, body: &str) -> &Self {
        let text = status_text(status);
        self.insert(route, Reply::Respond(RawResponse::new(status, text, body)));
        self
    }

    /// Fail `route` at the transport level
    pub fn fail(&self, route: &str, error: FetchError) -> &Self {
        self.insert(route, Reply::Fail(error));
        self
    }

    /// Every request seen so far, as route keys
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn clear_requests(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.clear();
        }
    }

    fn insert(&self, route: &str, reply: Reply) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.insert(route.to_string(), reply);
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let key = route_key(url);
        debug!("Mock: GET {}", key);

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(key.clone());
        }

        let routes = self
            .routes
            .lock()
            .map_err(|_| FetchError::network("mock route table poisoned"))?;

        match routes.get(&key) {
            Some(Reply::Respond(response)) => Ok(response.clone()),
            Some(Reply::Fail(error)) => Err(error.clone()),
            None => Ok(RawResponse::new(
                404,
                "Not Found",
                json!({ "status": 404, "title": "Resource Missing" }).to_string(),
            )),
        }
    }
}

/// Path and query of `url`, the key routes are matched on
pub fn route_key(url: &Url) -> String {
    url[Position::BeforePath..Position::AfterQuery].to_string()
}

/// A Horizon collection envelope holding `records`, linking to `next` when given
pub fn horizon_page(records: Vec<Value>, next: Option<&str>) -> Value {
    let mut links = json!({ "self": { "href": "" } });
    if let Some(href) = next {
        links["next"] = json!({ "href": href });
    }
    json!({
        "_links": links,
        "_embedded": { "records": records }
    })
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unrouted_request_is_404_and_recorded() {
        let mock = MockTransport::new();
        let url = Url::parse("https://horizon.test/accounts/X?limit=1").unwrap();

        let response = mock.get(&url).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(mock.requests(), vec!["/accounts/X?limit=1".to_string()]);
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let mock = MockTransport::new();
        mock.fail("/boom", FetchError::network("reset"));
        let url = Url::parse("https://horizon.test/boom").unwrap();

        assert_eq!(mock.get(&url).await, Err(FetchError::network("reset")));
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_page_envelope_shape() {
        let page = horizon_page(vec![json!({ "id": "1" })], Some("https://h/next"));
        assert_eq!(page["_embedded"]["records"][0]["id"], "1");
        assert_eq!(page["_links"]["next"]["href"], "https://h/next");
        assert!(horizon_page(vec![], None)["_links"].get("next").is_none());
    }
}
