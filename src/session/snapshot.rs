//! Offline sessions that replay captured search-result pages
//!
//! Used for selector regression checks against saved HTML and throughout
//! the test suite. Pages are parsed with `scraper`; `scraper::Html` is not
//! `Send`, so every lookup re-parses from owned HTML instead of holding a
//! parsed tree across an await.

use anyhow::Context;
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::{BrowserSession, ListingHandle, SessionFactory};
use crate::config::BrowserOptions;
use crate::error::SessionError;
use crate::model::Source;

/// Replays one HTML document per source
#[derive(Debug, Clone, Default)]
pub struct SnapshotSessionFactory {
    pages: HashMap<Source, Arc<str>>,
}

impl SnapshotSessionFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the results page served for `source`
    #[must_use]
    pub fn with_page(mut self, source: Source, html: impl Into<String>) -> Self {
        self.pages.insert(source, Arc::from(html.into()));
        self
    }

    /// Load `croma.html`, `amazon.html` and `flipkart.html` from `dir`
    ///
    /// Missing files are skipped; those sources then fail acquisition.
    pub fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        let mut factory = Self::new();
        for source in Source::ALL {
            let path = dir.join(format!("{}.html", source.as_str().to_ascii_lowercase()));
            if !path.exists() {
                continue;
            }
            let html = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            factory = factory.with_page(source, html);
        }
        Ok(factory)
    }

    #[must_use]
    pub fn has_page(&self, source: Source) -> bool {
        self.pages.contains_key(&source)
    }
}

#[async_trait]
impl SessionFactory for SnapshotSessionFactory {
    async fn acquire(
        &self,
        source: Source,
        _options: &BrowserOptions,
    ) -> Result<Box<dyn BrowserSession>, SessionError> {
        let html = self.pages.get(&source).cloned().ok_or_else(|| {
            SessionError::Acquisition(format!("no snapshot registered for {source}"))
        })?;
        Ok(Box::new(SnapshotSession::new(html)))
    }
}

/// Session over a single captured document
///
/// Navigation always "lands" on the captured page regardless of URL.
#[derive(Debug)]
pub struct SnapshotSession {
    html: Arc<str>,
    visited: Vec<String>,
    closed: bool,
}

impl SnapshotSession {
    #[must_use]
    pub fn new(html: Arc<str>) -> Self {
        Self {
            html,
            visited: Vec::new(),
            closed: false,
        }
    }

    /// URLs passed to `goto`, oldest first
    #[must_use]
    pub fn visited(&self) -> &[String] {
        &self.visited
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Text as a browser would render it: whitespace runs collapsed, trimmed
fn rendered_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl BrowserSession for SnapshotSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.visited.push(url.to_string());
        Ok(())
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        self.ensure_open()
    }

    async fn has_element(&mut self, selector: &str) -> bool {
        if self.closed {
            return false;
        }
        let Some(selector) = parse_selector(selector) else {
            return false;
        };
        Html::parse_document(&self.html)
            .select(&selector)
            .next()
            .is_some()
    }

    async fn find_listings(
        &mut self,
        selector: &str,
    ) -> Result<Vec<Box<dyn ListingHandle>>, SessionError> {
        self.ensure_open()?;
        let parsed = Selector::parse(selector)
            .map_err(|e| SessionError::Driver(format!("invalid selector '{selector}': {e}")))?;

        let document = Html::parse_document(&self.html);
        Ok(document
            .select(&parsed)
            .map(|element| {
                Box::new(SnapshotListing {
                    outer_html: element.html(),
                }) as Box<dyn ListingHandle>
            })
            .collect())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        Ok(())
    }
}

/// Listing container captured as outer HTML
struct SnapshotListing {
    outer_html: String,
}

impl SnapshotListing {
    fn lookup<T>(&self, selector: &str, read: impl Fn(ElementRef<'_>) -> Option<T>) -> Option<T> {
        let selector = parse_selector(selector)?;
        let fragment = Html::parse_fragment(&self.outer_html);
        let element = fragment.select(&selector).next()?;
        read(element)
    }
}

#[async_trait]
impl ListingHandle for SnapshotListing {
    async fn text(&self, selector: &str) -> Option<String> {
        self.lookup(selector, |el| Some(rendered_text(el)))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Option<String> {
        self.lookup(selector, |el| el.value().attr(name).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="item"><h3>  First
             product </h3><a href="/p/1">go</a></div>
          <div class="item"><h3>Second</h3></div>
        </body></html>
    "#;

    #[tokio::test]
    async fn listings_are_scoped_lookups() {
        let factory = SnapshotSessionFactory::new().with_page(Source::Croma, PAGE);
        let mut session = factory
            .acquire(Source::Croma, &BrowserOptions::default())
            .await
            .unwrap();

        assert!(session.has_element("div.item").await);
        assert!(!session.has_element("div.missing").await);
        assert!(!session.has_element("div[").await);

        let listings = session.find_listings("div.item").await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].text("h3").await.as_deref(), Some("First product"));
        assert_eq!(listings[0].attribute("a", "href").await.as_deref(), Some("/p/1"));
        assert_eq!(listings[1].attribute("a", "href").await, None);
        assert_eq!(listings[1].text("h3[").await, None);
    }

    #[tokio::test]
    async fn missing_snapshot_fails_acquisition() {
        let factory = SnapshotSessionFactory::new().with_page(Source::Croma, PAGE);
        let err = factory
            .acquire(Source::Amazon, &BrowserOptions::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SessionError::Acquisition(_)));
    }

    #[tokio::test]
    async fn closed_session_rejects_work() {
        let mut session = SnapshotSession::new(Arc::from(PAGE));
        session.close().await.unwrap();
        session.close().await.unwrap();
        assert!(matches!(
            session.goto("https://example.com").await,
            Err(SessionError::Closed)
        ));
        assert!(!session.has_element("div.item").await);
    }
}
