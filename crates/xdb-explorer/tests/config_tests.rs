//! Configuration system tests

use anyhow::Result;
use std::fs;
use tempfile::TempDir;
use xdb_explorer::config::{
    ExplorerConfig, HorizonConfig, LookupConfig, MonitoringConfig, PaginationConfig,
    DEFAULT_HORIZON_URL, DEFAULT_MAX_PAGES,
};
use xdb_explorer::ResourceKind;

/// Create a test configuration file
fn create_test_config_content() -> String {
    r#"
[horizon]
base_url = "https://horizon.testnet.xdbchain.com"
request_timeout_secs = 15
user_agent = "explorer-tests"

[pagination]
page_size = 10
max_pages = 3

[lookup]
resources = ["payments", "offers"]
native_asset_code = "XDB"

[monitoring]
log_level = "debug"
structured_logging = true
"#
    .to_string()
}

#[tokio::test]
async fn test_config_loading_from_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("explorer.toml");
    fs::write(&config_path, create_test_config_content())?;

    let config = ExplorerConfig::from_file(config_path.to_str().unwrap())?;

    assert_eq!(config.horizon.base_url, "https://horizon.testnet.xdbchain.com");
    assert_eq!(config.horizon.request_timeout_secs, Some(15));
    assert_eq!(config.pagination.page_size, 10);
    assert_eq!(config.pagination.max_pages, Some(3));
    assert_eq!(config.lookup.resources, vec![ResourceKind::Payments, ResourceKind::Offers]);
    assert_eq!(config.monitoring.log_level, "debug");
    assert!(config.monitoring.structured_logging);

    Ok(())
}

#[tokio::test]
async fn test_partial_config_loading() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("partial.toml");
    fs::write(&config_path, "[pagination]\npage_size = 25\n")?;

    let config = ExplorerConfig::from_file(config_path.to_str().unwrap())?;

    assert_eq!(config.pagination.page_size, 25);
    // Everything else falls back to defaults
    assert_eq!(config.pagination.max_pages, Some(DEFAULT_MAX_PAGES));
    assert!(!config.pagination.unbounded);
    assert_eq!(config.pagination.page_cap(), Some(DEFAULT_MAX_PAGES));
    assert_eq!(config.horizon.base_url, DEFAULT_HORIZON_URL);
    assert_eq!(config.horizon.request_timeout_secs, None);
    assert_eq!(config.lookup.resources, ResourceKind::ALL.to_vec());

    Ok(())
}

#[tokio::test]
async fn test_unbounded_switch_disables_page_cap() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("unbounded.toml");
    fs::write(&config_path, "[pagination]\npage_size = 200\nmax_pages = 5\nunbounded = true\n")?;

    let config = ExplorerConfig::from_file(config_path.to_str().unwrap())?;

    assert_eq!(config.pagination.max_pages, Some(5));
    assert_eq!(config.pagination.page_cap(), None);

    Ok(())
}

#[tokio::test]
async fn test_out_of_range_page_size_rejected_on_load() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[pagination]\npage_size = 500\n")?;

    assert!(ExplorerConfig::from_file(config_path.to_str().unwrap()).is_err());

    Ok(())
}

#[tokio::test]
async fn test_unknown_resource_rejected_on_load() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[lookup]\nresources = [\"ledgers\"]\n")?;

    assert!(ExplorerConfig::from_file(config_path.to_str().unwrap()).is_err());

    Ok(())
}

#[tokio::test]
async fn test_missing_file_is_error() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let config_path = temp_dir.path().join("absent.toml");

    assert!(ExplorerConfig::from_file(config_path.to_str().unwrap()).is_err());

    Ok(())
}

#[tokio::test]
async fn test_config_serialization() -> Result<()> {
    let config = ExplorerConfig {
        horizon: HorizonConfig {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: None,
            user_agent: "explorer-tests".to_string(),
        },
        pagination: PaginationConfig {
            page_size: 200,
            max_pages: Some(7),
            unbounded: false,
        },
        lookup: LookupConfig {
            resources: vec![ResourceKind::Effects],
            native_asset_code: "XDB".to_string(),
        },
        monitoring: MonitoringConfig {
            log_level: "warn".to_string(),
            structured_logging: false,
        },
    };

    let toml_str = toml::to_string(&config)?;

    assert!(toml_str.contains("[horizon]"));
    assert!(toml_str.contains("[pagination]"));
    assert!(toml_str.contains("[lookup]"));
    assert!(toml_str.contains("[monitoring]"));

    let deserialized: ExplorerConfig = toml::from_str(&toml_str)?;
    assert_eq!(config, deserialized);
    assert!(deserialized.ensure_valid().is_ok());

    Ok(())
}
