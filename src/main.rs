// Shopscrape HTTP server
//
// Serves aggregated product search over HTTP. Configuration comes from
// SHOPSCRAPE_* environment variables; logging from RUST_LOG.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kodegen_tools_shopscrape::browser_profile::cleanup_stale_profiles;
use kodegen_tools_shopscrape::utils::constants::DEFAULT_BIND_ADDR;
use kodegen_tools_shopscrape::{Aggregator, ChromeSessionFactory, ScrapeConfig, http};

const ENV_BIND: &str = "SHOPSCRAPE_BIND";

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = ScrapeConfig::from_env().context("Invalid SHOPSCRAPE_* configuration")?;
    info!(
        sources = ?config.source_order(),
        concurrent = config.concurrent(),
        headless = config.headless(),
        "Loaded configuration"
    );

    // Profiles from a previous crash would otherwise accumulate in temp
    if let Err(e) = cleanup_stale_profiles() {
        warn!("Stale profile cleanup failed: {:#}", e);
    }

    let factory =
        ChromeSessionFactory::new().with_cdp_timeout(config.navigation_timeout());
    let aggregator = Aggregator::new(Arc::new(factory), Arc::new(config));

    let bind = std::env::var(ENV_BIND).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    http::serve(aggregator, &bind)
        .await
        .with_context(|| format!("HTTP server on {bind} failed"))
}
