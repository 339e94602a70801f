//! One account lookup: snapshot plus every tracked collection
//!
//! The snapshot is fetched first. A missing account short-circuits the
//! lookup; otherwise each collection is collected in turn and its outcome
//! recorded on its own, so one failing resource never hides the others.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::address::AccountId;
use crate::client::LedgerApiClient;
use crate::config::ExplorerConfig;
use crate::core::{
    AccountState, AggregateResult, CollectionResult, ExplorerResult, FetchError, ResourceKind,
};
use crate::pagination::PaginatedCollector;

#[derive(Clone)]
pub struct AccountAggregator {
    client: Arc<LedgerApiClient>,
    collector: PaginatedCollector,
    resources: Vec<ResourceKind>,
    page_size: u32,
}

impl AccountAggregator {
    pub fn new(
        client: Arc<LedgerApiClient>,
        resources: Vec<ResourceKind>,
        page_size: u32,
        max_pages: Option<usize>,
    ) -> Self {
        let collector = PaginatedCollector::new(client.clone(), max_pages);
        Self {
            client,
            collector,
            resources,
            page_size,
        }
    }

    pub fn from_config(client: Arc<LedgerApiClient>, config: &ExplorerConfig) -> Self {
        Self::new(
            client,
            config.lookup.resources.clone(),
            config.pagination.page_size,
            config.pagination.page_cap(),
        )
    }

    pub fn resources(&self) -> &[ResourceKind] {
        &self.resources
    }

    pub fn collector(&self) -> &PaginatedCollector {
        &self.collector
    }

    /// Validate `input`, then look it up; invalid input issues no requests
    pub async fn lookup_address(&self, input: &str) -> ExplorerResult<AggregateResult> {
        let address = AccountId::parse(input)?;
        Ok(self.lookup(&address).await?)
    }

    /// Fresh snapshot and collections for `address`.
    ///
    /// Fails only when the snapshot itself cannot be fetched for a reason other than 404.
    pub async fn lookup(&self, address: &AccountId) -> Result<AggregateResult, FetchError> {
        info!("Looking up account {}", address);

        let snapshot = match self.client.fetch_account(address).await? {
            Some(snapshot) => snapshot,
            None => return Ok(AggregateResult::not_found(address.clone())),
        };

        let mut collections = BTreeMap::new();
        for kind in &self.resources {
            let result = self.collect(*kind, address).await;
            if let CollectionResult::Failed { error } = &result {
                warn!("Error loading {} for {}: {}", kind, address, error);
            }
            collections.insert(*kind, result);
        }

        info!(
            "Lookup of {} finished: {} collections, {} failed",
            address,
            collections.len(),
            collections.values().filter(|r| !r.is_success()).count()
        );

        Ok(AggregateResult {
            address: address.clone(),
            account: AccountState::Found(snapshot),
            collections,
        })
    }

    /// Collect a single resource for `address`
    pub async fn collect(&self, kind: ResourceKind, address: &AccountId) -> CollectionResult {
        let path = kind.path(address);
        let query = kind.scope_query(address);
        self.collector
            .collect_all(&path, &query, self.page_size)
            .await
            .into()
    }
}

#[cfg(all(test, feature = "mock-transport"))]
mod tests {
    use super::*;
    use crate::client::mock::{horizon_page, MockTransport};
    use crate::core::ExplorerError;
    use serde_json::json;

    const ADDRESS: &str = "GAIH3ULLFQ4DGSECF2AR555KZ4KNDGEKN4AFI4SU2M7B43MGK3QJZNSR";

    fn aggregator(mock: &Arc<MockTransport>, resources: Vec<ResourceKind>) -> AccountAggregator {
        let client = Arc::new(LedgerApiClient::with_transport("https://horizon.test", mock.clone()).unwrap());
        AccountAggregator::new(client, resources, 10, Some(5))
    }

    #[test]
    fn test_from_config_applies_page_cap() {
        let mock = Arc::new(MockTransport::new());
        let client = Arc::new(LedgerApiClient::with_transport("https://horizon.test", mock).unwrap());
        let mut config = ExplorerConfig::default();

        let capped = AccountAggregator::from_config(client.clone(), &config);
        assert_eq!(capped.collector().max_pages(), Some(50));

        config.pagination.unbounded = true;
        let unbounded = AccountAggregator::from_config(client, &config);
        assert_eq!(unbounded.collector().max_pages(), None);
    }

    #[tokio::test]
    async fn test_invalid_address_issues_no_requests() {
        let mock = Arc::new(MockTransport::new());

        let err = aggregator(&mock, ResourceKind::ALL.to_vec())
            .lookup_address("gaih3ull")
            .await
            .unwrap_err();

        assert!(matches!(err, ExplorerError::InvalidAddress { .. }));
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_server_error_is_terminal() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(&format!("/accounts/{ADDRESS}"), 502, json!({}));

        let err = aggregator(&mock, ResourceKind::ALL.to_vec())
            .lookup_address(ADDRESS)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ExplorerError::Fetch(FetchError::Http { status: 502, status_text: "Bad Gateway".to_string() })
        );
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn test_only_configured_resources_are_fetched() {
        let mock = Arc::new(MockTransport::new());
        mock.respond_json(
            &format!("/accounts/{ADDRESS}"),
            200,
            json!({ "id": ADDRESS, "account_id": ADDRESS, "sequence": "1" }),
        );
        mock.respond_json(
            &format!("/accounts/{ADDRESS}/payments?limit=10&order=desc"),
            200,
            horizon_page(vec![json!({ "id": "p1", "type": "payment" })], None),
        );

        let result = aggregator(&mock, vec![ResourceKind::Payments])
            .lookup_address(ADDRESS)
            .await
            .unwrap();

        assert_eq!(result.collections.len(), 1);
        assert_eq!(result.collection(ResourceKind::Payments).unwrap().records().unwrap().len(), 1);
        assert_eq!(mock.request_count(), 2);
    }
}
