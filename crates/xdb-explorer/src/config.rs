//! Configuration management for the explorer

use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::core::{ExplorerError, ResourceKind};

/// Public XDB Chain livenet Horizon
pub const DEFAULT_HORIZON_URL: &str = "https://horizon.livenet.xdbchain.com";

/// Largest page Horizon serves
pub const MAX_PAGE_SIZE: u32 = 200;

/// Pages fetched per collection before giving up
pub const DEFAULT_MAX_PAGES: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    #[validate]
    pub horizon: HorizonConfig,
    #[validate]
    pub pagination: PaginationConfig,
    pub lookup: LookupConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HorizonConfig {
    #[validate(url)]
    pub base_url: String,
    /// Whole-request timeout; unset leaves the transport default in place
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: Option<u64>,
    pub user_agent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaginationConfig {
    #[validate(range(min = 1, max = 200))]
    pub page_size: u32,
    /// Hard cap on pages per collection
    #[validate(range(min = 1))]
    pub max_pages: Option<usize>,
    /// Follow cursors with no cap, ignoring `max_pages`
    pub unbounded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Collections fetched by every lookup, in this order
    pub resources: Vec<ResourceKind>,
    /// Code shown for the network's native asset
    pub native_asset_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HORIZON_URL.to_string(),
            request_timeout_secs: None,
            user_agent: format!("xdb-explorer/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_PAGE_SIZE,
            max_pages: Some(DEFAULT_MAX_PAGES),
            unbounded: false,
        }
    }
}

impl PaginationConfig {
    /// Reject a page size Horizon would not serve
    pub fn check_page_size(page_size: u32) -> Result<u32, ExplorerError> {
        if (1..=MAX_PAGE_SIZE).contains(&page_size) {
            Ok(page_size)
        } else {
            Err(ExplorerError::Configuration(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}, got {page_size}"
            )))
        }
    }

    /// Cap handed to the collector; `None` when unbounded
    pub fn page_cap(&self) -> Option<usize> {
        if self.unbounded {
            None
        } else {
            self.max_pages
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            resources: ResourceKind::ALL.to_vec(),
            native_asset_code: "XDB".to_string(),
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl ExplorerConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;

        config.ensure_valid()?;

        Ok(config)
    }

    /// Declared range checks plus cross-field rules
    pub fn ensure_valid(&self) -> Result<(), ExplorerError> {
        self.validate()
            .map_err(|e| ExplorerError::Configuration(e.to_string()))?;

        let base = Url::parse(&self.horizon.base_url)
            .map_err(|e| ExplorerError::Configuration(format!("horizon.base_url: {e}")))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ExplorerError::Configuration(format!(
                "horizon.base_url must be http(s), got {}",
                base.scheme()
            )));
        }
        if self.lookup.resources.is_empty() {
            return Err(ExplorerError::Configuration(
                "lookup.resources cannot be empty".to_string(),
            ));
        }
        if self.lookup.native_asset_code.trim().is_empty() {
            return Err(ExplorerError::Configuration(
                "lookup.native_asset_code cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
