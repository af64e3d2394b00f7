//! Shared configuration constants for shopscrape
//!
//! Default values used by `ScrapeConfig` and the browser layer, kept in one
//! place so the extractor, the orchestrator and the binary agree on them.

use std::time::Duration;

/// Listings scraped per source: the first 3 results
///
/// Bounds per-source latency and keeps the request volume against each site
/// low enough to avoid rate limiting.
pub const DEFAULT_LISTING_CAP: usize = 3;

/// How long to wait for the first listing container to render
pub const DEFAULT_LISTING_WAIT_TIMEOUT: Duration = Duration::from_secs(20);

/// Interval between DOM polls while waiting for listings
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Pause after the forced scroll so lazy-loaded cards can attach
pub const DEFAULT_SCROLL_SETTLE: Duration = Duration::from_secs(2);

/// Pause appended after every scrape, successful or not
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound for `page.goto()` on a search page
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for extracting all fields of a single listing
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(10);

/// Overall deadline for one aggregated search request
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Longest accepted search query, in characters
pub const MAX_QUERY_LENGTH: usize = 512;

/// Absence marker for string fields (link, image, rating)
pub const UNAVAILABLE: &str = "N/A";

/// Color reported when a capacity title names none
pub const UNKNOWN_COLOR: &str = "Unknown";

/// Stock status reported for every listing
///
/// None of the supported result pages distinguish out-of-stock cards, so
/// this is the only value currently produced.
pub const IN_STOCK: &str = "In Stock";

/// Default bind address for the HTTP surface
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5001";

/// Prefix for per-session Chrome profile directories in the temp dir
pub const PROFILE_DIR_PREFIX: &str = "shopscrape_chrome";

/// Chrome user agent string for stealth mode
///
/// Chrome releases new stable versions ~every 4 weeks.
/// Update quarterly to stay within reasonable version window.
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
