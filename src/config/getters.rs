//! Getter methods for `ScrapeConfig`

use std::time::Duration;

use super::types::{BrowserOptions, ScrapeConfig};
use crate::model::Source;

impl ScrapeConfig {
    #[must_use]
    pub fn source_order(&self) -> &[Source] {
        &self.source_order
    }

    #[must_use]
    pub fn listing_cap(&self) -> usize {
        self.listing_cap
    }

    #[must_use]
    pub fn listing_wait_timeout(&self) -> Duration {
        self.listing_wait_timeout
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    #[must_use]
    pub fn scroll_settle(&self) -> Duration {
        self.scroll_settle
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        self.navigation_timeout
    }

    #[must_use]
    pub fn listing_timeout(&self) -> Duration {
        self.listing_timeout
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn concurrent(&self) -> bool {
        self.concurrent
    }

    #[must_use]
    pub fn browser(&self) -> &BrowserOptions {
        &self.browser
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.browser.headless
    }
}
