//! Environment overlay for `ScrapeConfig`
//!
//! The binary starts from defaults and lets a handful of `SHOPSCRAPE_*`
//! variables override them. Library callers use the builder directly.

use anyhow::{Context, Result};
use std::time::Duration;

use super::builder::ScrapeConfigBuilder;
use super::types::ScrapeConfig;
use crate::model::Source;

pub const ENV_SOURCES: &str = "SHOPSCRAPE_SOURCES";
pub const ENV_LISTING_CAP: &str = "SHOPSCRAPE_LISTING_CAP";
pub const ENV_CONCURRENT: &str = "SHOPSCRAPE_CONCURRENT";
pub const ENV_HEADLESS: &str = "SHOPSCRAPE_HEADLESS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SHOPSCRAPE_REQUEST_TIMEOUT_SECS";

impl ScrapeConfig {
    /// Defaults overlaid with `SHOPSCRAPE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder()
            .overlay(|key| std::env::var(key).ok())?
            .build()
    }
}

impl ScrapeConfigBuilder {
    /// Apply overrides from a key lookup (the process environment in `from_env`)
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_SOURCES) {
            let order = parse_source_list(&raw)
                .with_context(|| format!("Invalid {ENV_SOURCES} value '{raw}'"))?;
            self = self.source_order(order);
        }

        if let Some(raw) = lookup(ENV_LISTING_CAP) {
            let cap = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid {ENV_LISTING_CAP} value '{raw}'"))?;
            self = self.listing_cap(cap);
        }

        if let Some(raw) = lookup(ENV_CONCURRENT) {
            self = self.concurrent(parse_flag(&raw).with_context(|| {
                format!("Invalid {ENV_CONCURRENT} value '{raw}'")
            })?);
        }

        if let Some(raw) = lookup(ENV_HEADLESS) {
            self = self.headless(
                parse_flag(&raw).with_context(|| format!("Invalid {ENV_HEADLESS} value '{raw}'"))?,
            );
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid {ENV_REQUEST_TIMEOUT_SECS} value '{raw}'"))?;
            self = self.request_timeout(Duration::from_secs(secs));
        }

        Ok(self)
    }
}

/// Parse a comma-separated source list, e.g. `"amazon, flipkart"`
pub fn parse_source_list(raw: &str) -> Result<Vec<Source>> {
    raw.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.parse::<Source>().map_err(anyhow::Error::msg))
        .collect()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("expected a boolean, got '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overlay_applies_every_variable() {
        let config = ScrapeConfig::builder()
            .overlay(lookup(&[
                (ENV_SOURCES, "flipkart,amazon"),
                (ENV_LISTING_CAP, "5"),
                (ENV_CONCURRENT, "true"),
                (ENV_REQUEST_TIMEOUT_SECS, "45"),
            ]))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(config.source_order(), &[Source::Flipkart, Source::Amazon]);
        assert_eq!(config.listing_cap(), 5);
        assert!(config.concurrent());
        assert_eq!(config.request_timeout(), Duration::from_secs(45));
    }

    #[test]
    fn overlay_without_variables_keeps_defaults() {
        let config = ScrapeConfig::builder()
            .overlay(|_| None)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.source_order(), &Source::ALL);
    }

    #[test]
    fn overlay_rejects_garbage() {
        assert!(
            ScrapeConfig::builder()
                .overlay(lookup(&[(ENV_SOURCES, "croma,ebay")]))
                .is_err()
        );
        assert!(
            ScrapeConfig::builder()
                .overlay(lookup(&[(ENV_CONCURRENT, "sometimes")]))
                .is_err()
        );
    }
}
