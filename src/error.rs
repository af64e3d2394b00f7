//! Error types for sessions, extractors and aggregated searches
//!
//! Only `SessionError::Acquisition` (surfaced through `ScrapeError` and
//! `SearchError::Aggregate`) and caller errors ever reach the HTTP layer.
//! Navigation timeouts, missing fields and broken listings are recovered
//! inside the extractor and show up as fewer results instead.

use thiserror::Error;

use crate::model::{ProductRecord, Source};

/// Errors raised by a browser session
#[derive(Debug, Error)]
pub enum SessionError {
    /// Browser could not be launched or connected to
    #[error("Failed to acquire browser session: {0}")]
    Acquisition(String),

    /// Navigation to the search page failed or timed out
    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// Any other CDP / DOM fault
    #[error("Browser driver error: {0}")]
    Driver(String),

    /// Session was already released
    #[error("Browser session already closed")]
    Closed,
}

impl From<chromiumoxide::error::CdpError> for SessionError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        Self::Driver(err.to_string())
    }
}

/// Extractor-level failures for a single source
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// No session could be acquired; fatal for this extractor
    #[error("{site}: {error}")]
    SessionAcquisition {
        site: Source,
        #[source]
        error: SessionError,
    },

    /// `scrape` was called after `close`
    #[error("{0} extractor is closed")]
    Closed(Source),

    /// `scrape` was called a second time on the same session
    #[error("{0} extractor already used its session")]
    AlreadyScraped(Source),
}

impl ScrapeError {
    #[must_use]
    pub fn source_site(&self) -> Source {
        match self {
            Self::SessionAcquisition { site, .. } => *site,
            Self::Closed(site) | Self::AlreadyScraped(site) => *site,
        }
    }
}

/// Reasons a single listing is skipped
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ListingError {
    #[error("listing has no title")]
    MissingTitle,

    #[error("listing extraction timed out")]
    Timeout,
}

/// Errors surfaced by `Aggregator::search`
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("No query provided")]
    EmptyQuery,

    #[error("Search query is too long ({len} characters, maximum {max})")]
    QueryTooLong { len: usize, max: usize },

    /// One or more sources failed outright. Sessions are already released
    /// and the results gathered from healthy sources are kept in `partial`.
    #[error("{} source(s) failed: {}", .failures.len(), summarize(.failures))]
    Aggregate {
        failures: Vec<ScrapeError>,
        partial: Vec<ProductRecord>,
    },
}

impl SearchError {
    /// Whether the caller, not the scrape, is at fault
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::EmptyQuery | Self::QueryTooLong { .. })
    }

    /// Records collected before the failure, if any
    #[must_use]
    pub fn partial_results(&self) -> &[ProductRecord] {
        match self {
            Self::Aggregate { partial, .. } => partial,
            _ => &[],
        }
    }
}

fn summarize(failures: &[ScrapeError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
