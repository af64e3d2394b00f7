//! Scrape events and the observer they are reported to
//!
//! Extractors and the aggregator never log through ambient global state.
//! They emit `ScrapeEvent`s to an injected `ScrapeObserver`; the default
//! `TracingObserver` turns each event into a structured `tracing` record.

use std::time::Duration;

use crate::model::Source;

/// Events emitted while a search runs
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeEvent {
    /// Extractor acquired its session
    SessionReady { source: Source },
    /// Navigation to the search page is about to start
    SourceStarted { source: Source, query: String, url: String },
    /// Navigation failed or timed out; source contributes nothing
    NavigationFailed { source: Source, url: String, reason: String },
    /// Forced scroll failed; scraping continues with whatever rendered
    ScrollFailed { source: Source, reason: String },
    /// No listing container appeared within the wait timeout
    ListingWaitTimedOut { source: Source, selector: String, waited: Duration },
    /// Listing containers were present but could not be enumerated
    ListingLookupFailed { source: Source, reason: String },
    /// Listing containers found on the page (before the cap)
    ListingsFound { source: Source, count: usize, cap: usize },
    /// A listing was dropped because extraction failed
    ListingSkipped { source: Source, index: usize, reason: String },
    /// A listing was dropped because it is an advertisement
    SponsoredSkipped { source: Source, index: usize },
    /// Title did not match the canonical pattern and was kept as-is
    TitleNotNormalized { source: Source, title: String },
    /// Scrape finished with this many records (before relevance filtering)
    SourceFinished { source: Source, records: usize },
    /// Relevance filter result for one source's batch
    RelevanceFiltered { source: Source, kept: usize, dropped: usize },
    /// The request deadline expired while this source was scraping
    DeadlineExceeded { source: Source },
    /// Session teardown failed; the failure is not propagated
    TeardownFailed { source: Source, reason: String },
    /// Session released
    SessionClosed { source: Source },
}

impl ScrapeEvent {
    #[must_use]
    pub fn source(&self) -> Source {
        match self {
            Self::SessionReady { source }
            | Self::SourceStarted { source, .. }
            | Self::NavigationFailed { source, .. }
            | Self::ScrollFailed { source, .. }
            | Self::ListingWaitTimedOut { source, .. }
            | Self::ListingLookupFailed { source, .. }
            | Self::ListingsFound { source, .. }
            | Self::ListingSkipped { source, .. }
            | Self::SponsoredSkipped { source, .. }
            | Self::TitleNotNormalized { source, .. }
            | Self::SourceFinished { source, .. }
            | Self::RelevanceFiltered { source, .. }
            | Self::DeadlineExceeded { source }
            | Self::TeardownFailed { source, .. }
            | Self::SessionClosed { source } => *source,
        }
    }
}

/// Receiver for scrape events
pub trait ScrapeObserver: Send + Sync {
    fn on_event(&self, event: &ScrapeEvent);
}

/// Observer that writes every event to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScrapeObserver for TracingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        use tracing::{debug, info, warn};

        match event {
            ScrapeEvent::SessionReady { source } => {
                info!(%source, "Browser session initialized");
            }
            ScrapeEvent::SourceStarted { source, query, url } => {
                info!(%source, query = %query, url = %url, "Scraping search results");
            }
            ScrapeEvent::NavigationFailed { source, url, reason } => {
                warn!(%source, url = %url, "Navigation failed: {}", reason);
            }
            ScrapeEvent::ScrollFailed { source, reason } => {
                debug!(%source, "Scroll to bottom failed: {}", reason);
            }
            ScrapeEvent::ListingWaitTimedOut { source, selector, waited } => {
                warn!(
                    %source,
                    selector = %selector,
                    "No listings appeared after {:.1}s",
                    waited.as_secs_f64()
                );
            }
            ScrapeEvent::ListingLookupFailed { source, reason } => {
                warn!(%source, "Failed to enumerate listings: {}", reason);
            }
            ScrapeEvent::ListingsFound { source, count, cap } => {
                info!(%source, "Found {} listings (scraping at most {})", count, cap);
            }
            ScrapeEvent::ListingSkipped { source, index, reason } => {
                warn!(%source, index, "Skipping listing: {}", reason);
            }
            ScrapeEvent::SponsoredSkipped { source, index } => {
                debug!(%source, index, "Skipping sponsored listing");
            }
            ScrapeEvent::TitleNotNormalized { source, title } => {
                warn!(%source, "Unable to standardize title: {}", title);
            }
            ScrapeEvent::SourceFinished { source, records } => {
                info!(%source, "Scraped {} products", records);
            }
            ScrapeEvent::RelevanceFiltered { source, kept, dropped } => {
                debug!(%source, kept, dropped, "Applied relevance filter");
            }
            ScrapeEvent::DeadlineExceeded { source } => {
                warn!(%source, "Request deadline exceeded, abandoning source");
            }
            ScrapeEvent::TeardownFailed { source, reason } => {
                warn!(%source, "Error closing browser session: {}", reason);
            }
            ScrapeEvent::SessionClosed { source } => {
                info!(%source, "Browser session closed");
            }
        }
    }
}

/// Observer that discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl ScrapeObserver for NullObserver {
    fn on_event(&self, _event: &ScrapeEvent) {}
}
