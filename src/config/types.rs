//! Core configuration types for aggregated product searches
//!
//! `ScrapeConfig` carries the source order, the per-source scrape bounds and
//! the browser launch options handed to every session at construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::model::Source;
use crate::utils::constants::{
    CHROME_USER_AGENT, DEFAULT_LISTING_CAP, DEFAULT_LISTING_TIMEOUT, DEFAULT_LISTING_WAIT_TIMEOUT,
    DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SCROLL_SETTLE, DEFAULT_SETTLE_DELAY,
};

/// Browser launch options shared by every session
///
/// Static for the lifetime of a `ScrapeConfig`; each session is launched
/// with exactly these options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserOptions {
    /// Run Chrome without a window (default: true)
    pub headless: bool,
    /// User agent reported by every page
    pub user_agent: String,
    /// Window / viewport size in CSS pixels
    pub window: (u32, u32),
    /// Extra command-line switches appended after the stealth set
    pub extra_args: Vec<String>,
    /// Explicit Chrome binary; `None` searches the system, then downloads
    pub chrome_executable: Option<PathBuf>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            user_agent: CHROME_USER_AGENT.to_string(),
            window: (1920, 1080),
            extra_args: Vec::new(),
            chrome_executable: None,
        }
    }
}

/// Main configuration for an aggregated search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Sources in the order their results are merged.
    ///
    /// **INVARIANT:** non-empty and free of duplicates (checked in builder).
    pub(crate) source_order: Vec<Source>,

    /// Listings scraped per source
    pub(crate) listing_cap: usize,

    /// Wait for the first listing container before giving up on a source
    pub(crate) listing_wait_timeout: Duration,

    /// DOM polling interval during the listing wait
    pub(crate) poll_interval: Duration,

    /// Pause after scrolling to the bottom of the results page
    pub(crate) scroll_settle: Duration,

    /// Pause appended after every scrape
    pub(crate) settle_delay: Duration,

    /// Upper bound for search page navigation
    pub(crate) navigation_timeout: Duration,

    /// Upper bound for extracting one listing
    pub(crate) listing_timeout: Duration,

    /// Overall deadline for one `search()` call
    pub(crate) request_timeout: Duration,

    /// Scrape all sources at once instead of one after another
    pub(crate) concurrent: bool,

    pub(crate) browser: BrowserOptions,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            source_order: Source::ALL.to_vec(),
            listing_cap: DEFAULT_LISTING_CAP,
            listing_wait_timeout: DEFAULT_LISTING_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            scroll_settle: DEFAULT_SCROLL_SETTLE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            listing_timeout: DEFAULT_LISTING_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            concurrent: false,
            browser: BrowserOptions::default(),
        }
    }
}
