//! XDB Chain wallet explorer CLI
//!
//! Validates an account address, looks it up on a Horizon API and prints
//! the account together with its transactions, payments, offers, effects
//! and issued assets.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;
use xdb_explorer::config::PaginationConfig;
use xdb_explorer::{
    AccountAggregator, AccountId, ExplorerConfig, LedgerApiClient, Renderer, ResourceKind,
};

#[derive(Parser)]
#[command(name = "xdb-explorer")]
#[command(about = "XDB Chain wallet explorer", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "explorer.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Override the Horizon base URL
    #[arg(long)]
    horizon_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check an address offline
    Validate {
        address: String,
    },

    /// Fetch the account and every tracked collection
    Lookup(LookupCmd),

    /// Fetch a single page of one collection
    Page(PageCmd),
}

#[derive(Args)]
struct LookupCmd {
    /// Account address (G...)
    address: String,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Records requested per page (1-200)
    #[arg(long)]
    page_size: Option<u32>,

    /// Maximum pages per collection
    #[arg(long, conflicts_with = "unbounded")]
    max_pages: Option<usize>,

    /// Follow cursors without a page cap
    #[arg(long)]
    unbounded: bool,

    /// Collections to fetch, comma separated
    #[arg(long, value_delimiter = ',')]
    resources: Option<Vec<ResourceKind>>,
}

#[derive(Args)]
struct PageCmd {
    /// Account address (G...)
    address: String,

    /// transactions, payments, offers, effects or assets
    resource: ResourceKind,

    /// Cursor URL printed by a previous page
    #[arg(long)]
    cursor: Option<String>,

    /// Records requested (1-200)
    #[arg(long, default_value_t = 10)]
    limit: u32,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_found = std::path::Path::new(&cli.config).exists();
    let mut config = if config_found {
        ExplorerConfig::from_file(&cli.config)?
    } else {
        ExplorerConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }
    if let Some(horizon_url) = cli.horizon_url {
        config.horizon.base_url = horizon_url;
    }

    init_logging(&config)?;
    if !config_found {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    match cli.command {
        Commands::Validate { address } => validate(&address),
        Commands::Lookup(cmd) => lookup(config, cmd).await,
        Commands::Page(cmd) => page(config, cmd).await,
    }
}

fn validate(address: &str) -> Result<()> {
    match AccountId::parse(address) {
        Ok(id) => {
            println!("valid: {id}");
            Ok(())
        }
        Err(e) => Err(anyhow!(e)),
    }
}

async fn lookup(mut config: ExplorerConfig, cmd: LookupCmd) -> Result<()> {
    if let Some(page_size) = cmd.page_size {
        config.pagination.page_size = page_size;
    }
    if let Some(max_pages) = cmd.max_pages {
        config.pagination.max_pages = Some(max_pages);
        config.pagination.unbounded = false;
    }
    if cmd.unbounded {
        config.pagination.unbounded = true;
    }
    if let Some(resources) = cmd.resources {
        config.lookup.resources = resources;
    }
    config.ensure_valid()?;

    let client = Arc::new(LedgerApiClient::new(&config.horizon)?);
    let aggregator = AccountAggregator::from_config(client, &config);

    let result = aggregator.lookup_address(&cmd.address).await?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", Renderer::new(&config.lookup.native_asset_code).aggregate(&result));
    }

    let failed = result.failed_resources();
    if !failed.is_empty() {
        info!("{} collection(s) failed to load", failed.len());
    }
    Ok(())
}

async fn page(config: ExplorerConfig, cmd: PageCmd) -> Result<()> {
    config.ensure_valid()?;
    let limit = PaginationConfig::check_page_size(cmd.limit)?;
    let address = AccountId::parse(&cmd.address)?;
    let cursor = cmd.cursor.as_deref().map(Url::parse).transpose()?;

    let client = Arc::new(LedgerApiClient::new(&config.horizon)?);
    let aggregator = AccountAggregator::from_config(client, &config);

    let path = cmd.resource.path(&address);
    let query = cmd.resource.scope_query(&address);
    let page = aggregator
        .collector()
        .page(&path, &query, limit, cursor.as_ref())
        .await?;

    if cmd.json {
        let body = json!({
            "records": page.records,
            "next": page.next.as_ref().map(Url::as_str),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", Renderer::new(&config.lookup.native_asset_code).page(cmd.resource, &page));
    }
    Ok(())
}

fn init_logging(config: &ExplorerConfig) -> Result<()> {
    let log_level = config.monitoring.log_level.parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("xdb_explorer={}", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
