//! Browser sessions
//!
//! A session is one exclusive automated browser (or a replay of captured
//! pages) used by exactly one extractor. Extractors only see the traits in
//! this module, so Chrome and the snapshot replay are interchangeable.

use async_trait::async_trait;

use crate::config::BrowserOptions;
use crate::error::SessionError;
use crate::model::Source;

pub mod chrome;
pub mod snapshot;

pub use chrome::{ChromeSession, ChromeSessionFactory};
pub use snapshot::{SnapshotSession, SnapshotSessionFactory};

/// One listing container on a results page
///
/// Lookups are scoped to the container. Any driver fault or missing match
/// is reported as `None`; listings are best-effort.
#[async_trait]
pub trait ListingHandle: Send + Sync {
    /// Rendered text of the first descendant matching `selector`
    async fn text(&self, selector: &str) -> Option<String>;

    /// Attribute `name` of the first descendant matching `selector`
    async fn attribute(&self, selector: &str, name: &str) -> Option<String>;
}

/// Exclusive page-automation session
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate and wait for the document to load
    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// Scroll to the bottom of the document to trigger lazy rendering
    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError>;

    /// Whether at least one element currently matches `selector`
    async fn has_element(&mut self, selector: &str) -> bool;

    /// Every element matching `selector`, in document order
    async fn find_listings(
        &mut self,
        selector: &str,
    ) -> Result<Vec<Box<dyn ListingHandle>>, SessionError>;

    /// Release the session. Calling it again is a no-op.
    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Hands out sessions to extractors
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn acquire(
        &self,
        source: Source,
        options: &BrowserOptions,
    ) -> Result<Box<dyn BrowserSession>, SessionError>;
}
