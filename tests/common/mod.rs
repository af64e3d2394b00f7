//! Shared fixtures for the shopscrape test suite

#![allow(dead_code)]

use async_trait::async_trait;
use kodegen_tools_shopscrape::{
    BrowserOptions, BrowserSession, ListingHandle, ScrapeConfig, ScrapeConfigBuilder, ScrapeEvent,
    ScrapeObserver, SessionError, SessionFactory, SnapshotSessionFactory, Source,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const QUERY: &str = "iphone 13";

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Snapshot factory serving the captured page of every source
pub fn snapshot_factory() -> SnapshotSessionFactory {
    SnapshotSessionFactory::from_dir(&fixtures_dir()).expect("fixtures load")
}

/// Config with every wait shrunk so tests run in milliseconds
pub fn fast_config() -> ScrapeConfigBuilder {
    ScrapeConfig::builder()
        .scroll_settle(Duration::ZERO)
        .settle_delay(Duration::ZERO)
        .listing_wait_timeout(Duration::from_millis(50))
        .poll_interval(Duration::from_millis(5))
        .navigation_timeout(Duration::from_millis(200))
        .listing_timeout(Duration::from_secs(1))
        .request_timeout(Duration::from_secs(5))
}

/// Observer that keeps every event for later assertions
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ScrapeEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ScrapeEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&ScrapeEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl ScrapeObserver for RecordingObserver {
    fn on_event(&self, event: &ScrapeEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Fault injection for one source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    FailAcquire,
    FailGoto,
    HangGoto,
    HangLookup,
    FailClose,
}

/// Wraps the snapshot factory and injects faults per source
///
/// Counts acquisitions and `close()` calls so tests can check that every
/// acquired session is released exactly once.
#[derive(Clone, Default)]
pub struct ScriptedFactory {
    inner: SnapshotSessionFactory,
    faults: Vec<(Source, Fault)>,
    pub acquired: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn new(inner: SnapshotSessionFactory) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn with_fault(mut self, source: Source, fault: Fault) -> Self {
        self.faults.push((source, fault));
        self
    }

    fn has_fault(&self, source: Source, fault: Fault) -> bool {
        self.faults.contains(&(source, fault))
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for ScriptedFactory {
    async fn acquire(
        &self,
        source: Source,
        options: &BrowserOptions,
    ) -> Result<Box<dyn BrowserSession>, SessionError> {
        if self.has_fault(source, Fault::FailAcquire) {
            return Err(SessionError::Acquisition(format!(
                "chrome for {source} refused to start"
            )));
        }

        let inner = self.inner.acquire(source, options).await?;
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            inner,
            fail_goto: self.has_fault(source, Fault::FailGoto),
            hang_goto: self.has_fault(source, Fault::HangGoto),
            hang_lookup: self.has_fault(source, Fault::HangLookup),
            fail_close: self.has_fault(source, Fault::FailClose),
            closed: self.closed.clone(),
            released: false,
        }))
    }
}

struct ScriptedSession {
    inner: Box<dyn BrowserSession>,
    fail_goto: bool,
    hang_goto: bool,
    hang_lookup: bool,
    fail_close: bool,
    closed: Arc<AtomicUsize>,
    released: bool,
}

#[async_trait]
impl BrowserSession for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        if self.hang_goto {
            std::future::pending::<()>().await;
        }
        if self.fail_goto {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".to_string(),
            });
        }
        self.inner.goto(url).await
    }

    async fn scroll_to_bottom(&mut self) -> Result<(), SessionError> {
        self.inner.scroll_to_bottom().await
    }

    async fn has_element(&mut self, selector: &str) -> bool {
        if self.hang_lookup {
            std::future::pending::<()>().await;
        }
        self.inner.has_element(selector).await
    }

    async fn find_listings(
        &mut self,
        selector: &str,
    ) -> Result<Vec<Box<dyn ListingHandle>>, SessionError> {
        self.inner.find_listings(selector).await
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if !self.released {
            self.released = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.close().await?;
        if self.fail_close {
            return Err(SessionError::Driver("browser process already gone".to_string()));
        }
        Ok(())
    }
}
