//! Fluent builder for `ScrapeConfig`
//!
//! Every field has a default, so `ScrapeConfig::builder().build()` is valid.
//! `build()` enforces the invariants the extractor and aggregator rely on.

use anyhow::{Result, anyhow, bail};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use super::types::{BrowserOptions, ScrapeConfig};
use crate::model::Source;

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    pub(crate) inner: ScrapeConfig,
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder {
            inner: ScrapeConfig::default(),
        }
    }
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        ScrapeConfig::builder()
    }
}

impl ScrapeConfigBuilder {
    /// Set the order sources are scraped and merged in
    ///
    /// Ordering is significant: when results are capped downstream, earlier
    /// sources win.
    #[must_use]
    pub fn source_order(mut self, order: impl IntoIterator<Item = Source>) -> Self {
        self.inner.source_order = order.into_iter().collect();
        self
    }

    #[must_use]
    pub fn listing_cap(mut self, cap: usize) -> Self {
        self.inner.listing_cap = cap;
        self
    }

    #[must_use]
    pub fn listing_wait_timeout(mut self, timeout: Duration) -> Self {
        self.inner.listing_wait_timeout = timeout;
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.inner.poll_interval = interval;
        self
    }

    #[must_use]
    pub fn scroll_settle(mut self, delay: Duration) -> Self {
        self.inner.scroll_settle = delay;
        self
    }

    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.inner.settle_delay = delay;
        self
    }

    #[must_use]
    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.inner.navigation_timeout = timeout;
        self
    }

    #[must_use]
    pub fn listing_timeout(mut self, timeout: Duration) -> Self {
        self.inner.listing_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.inner.request_timeout = timeout;
        self
    }

    /// Scrape every source at once (one session per source)
    ///
    /// Results are still merged in `source_order`.
    #[must_use]
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.inner.concurrent = concurrent;
        self
    }

    /// Set browser headless mode
    ///
    /// **Headless mode is enforced in release builds.** Headed mode needs a
    /// display server and is only honoured in debug builds.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.inner.browser.headless = headless;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner.browser.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn window(mut self, width: u32, height: u32) -> Self {
        self.inner.browser.window = (width, height);
        self
    }

    #[must_use]
    pub fn extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.inner.browser.extra_args.push(arg.into());
        self
    }

    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.inner.browser.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn browser(mut self, options: BrowserOptions) -> Self {
        self.inner.browser = options;
        self
    }

    pub fn build(self) -> Result<ScrapeConfig> {
        let mut config = self.inner;

        if config.source_order.is_empty() {
            bail!("source_order must name at least one source");
        }

        let mut seen = HashSet::new();
        if let Some(dup) = config.source_order.iter().find(|s| !seen.insert(**s)) {
            return Err(anyhow!("source_order lists {dup} more than once"));
        }

        if config.listing_cap == 0 {
            bail!("listing_cap must be at least 1");
        }

        if config.poll_interval.is_zero() {
            bail!("poll_interval must be non-zero");
        }

        if config.request_timeout.is_zero() {
            bail!("request_timeout must be non-zero");
        }

        // Enforce headless mode in release builds for production safety
        #[cfg(not(debug_assertions))]
        let headless = if !config.browser.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            true
        } else {
            config.browser.headless
        };

        #[cfg(debug_assertions)]
        let headless = config.browser.headless;

        config.browser.headless = headless;

        Ok(config)
    }
}
