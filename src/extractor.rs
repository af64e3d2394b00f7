//! Per-source scrape driver
//!
//! A `SourceExtractor` owns one session for one query:
//!
//! ```text
//! Idle -> SessionReady -> NavigatedToResults -> ListingsLoaded -> Scraped -> Closed
//!                \______________________ Failed ____________________/
//! ```
//!
//! Only session acquisition is fatal. Navigation failures and listing-wait
//! timeouts produce an empty batch, and a broken listing only loses itself.

use std::sync::Arc;
use tokio::time::{Instant, sleep, timeout};

use crate::config::ScrapeConfig;
use crate::error::{ListingError, ScrapeError};
use crate::model::{ProductRecord, Source};
use crate::observer::{ScrapeEvent, ScrapeObserver};
use crate::session::{BrowserSession, SessionFactory};
use crate::sources::{Listing, SourceProfile, profile};

/// Lifecycle of a `SourceExtractor`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorState {
    Idle,
    SessionReady,
    NavigatedToResults,
    ListingsLoaded,
    Scraped,
    Closed,
    Failed,
}

pub struct SourceExtractor {
    driver: Driver,
    session: Option<Box<dyn BrowserSession>>,
    state: ExtractorState,
}

/// Everything a scrape needs except the session and the state it advances
struct Driver {
    profile: &'static SourceProfile,
    config: Arc<ScrapeConfig>,
    observer: Arc<dyn ScrapeObserver>,
}

impl SourceExtractor {
    /// Acquire a session for `source`
    ///
    /// Acquisition failure is returned as-is; no extractor exists without a
    /// session.
    pub async fn construct(
        source: Source,
        factory: &dyn SessionFactory,
        config: Arc<ScrapeConfig>,
        observer: Arc<dyn ScrapeObserver>,
    ) -> Result<Self, ScrapeError> {
        let session = factory
            .acquire(source, config.browser())
            .await
            .map_err(|error| ScrapeError::SessionAcquisition { site: source, error })?;

        observer.on_event(&ScrapeEvent::SessionReady { source });

        Ok(Self {
            driver: Driver {
                profile: profile(source),
                config,
                observer,
            },
            session: Some(session),
            state: ExtractorState::SessionReady,
        })
    }

    #[must_use]
    pub fn source(&self) -> Source {
        self.driver.profile.source
    }

    #[must_use]
    pub fn state(&self) -> ExtractorState {
        self.state
    }

    /// Scrape the first page of results for `query`
    ///
    /// Runs once per extractor. The settle delay is applied on every exit
    /// path that reaches the site. The session stays owned by the extractor
    /// throughout, so `close()` reaches it even if this future is dropped.
    pub async fn scrape(&mut self, query: &str) -> Result<Vec<ProductRecord>, ScrapeError> {
        let source = self.source();
        match self.state {
            ExtractorState::SessionReady => {}
            ExtractorState::Closed => return Err(ScrapeError::Closed(source)),
            _ => return Err(ScrapeError::AlreadyScraped(source)),
        }

        let Some(session) = self.session.as_deref_mut() else {
            self.state = ExtractorState::Failed;
            return Err(ScrapeError::Closed(source));
        };

        let records = self.driver.run(&mut self.state, session, query).await;

        sleep(self.driver.config.settle_delay()).await;

        if self.state != ExtractorState::Failed {
            self.state = ExtractorState::Scraped;
        }
        self.driver.emit(ScrapeEvent::SourceFinished {
            source,
            records: records.len(),
        });
        Ok(records)
    }

    /// Release the session
    ///
    /// Idempotent. Teardown failures are reported to the observer and
    /// otherwise ignored; the extractor is unusable afterwards.
    pub async fn close(&mut self) {
        let source = self.source();
        self.state = ExtractorState::Closed;

        let Some(mut session) = self.session.take() else {
            return;
        };

        match session.close().await {
            Ok(()) => self.driver.emit(ScrapeEvent::SessionClosed { source }),
            Err(e) => self.driver.emit(ScrapeEvent::TeardownFailed {
                source,
                reason: e.to_string(),
            }),
        }
    }
}

impl Driver {
    fn source(&self) -> Source {
        self.profile.source
    }

    fn emit(&self, event: ScrapeEvent) {
        self.observer.on_event(&event);
    }

    async fn run(
        &self,
        state: &mut ExtractorState,
        session: &mut dyn BrowserSession,
        query: &str,
    ) -> Vec<ProductRecord> {
        let source = self.source();
        let url = self.profile.search_url(query);

        self.emit(ScrapeEvent::SourceStarted {
            source,
            query: query.to_string(),
            url: url.clone(),
        });

        let reason = match timeout(self.config.navigation_timeout(), session.goto(&url)).await {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e.to_string()),
            Err(_) => Some(format!(
                "timed out after {}s",
                self.config.navigation_timeout().as_secs()
            )),
        };
        if let Some(reason) = reason {
            *state = ExtractorState::Failed;
            self.emit(ScrapeEvent::NavigationFailed { source, url, reason });
            return Vec::new();
        }
        *state = ExtractorState::NavigatedToResults;

        if let Err(e) = session.scroll_to_bottom().await {
            self.emit(ScrapeEvent::ScrollFailed {
                source,
                reason: e.to_string(),
            });
        }
        sleep(self.config.scroll_settle()).await;

        if !self.wait_for_listings(session).await {
            return Vec::new();
        }

        let listings = match session.find_listings(self.profile.listing_selector).await {
            Ok(listings) => listings,
            Err(e) => {
                *state = ExtractorState::Failed;
                self.emit(ScrapeEvent::ListingLookupFailed {
                    source,
                    reason: e.to_string(),
                });
                return Vec::new();
            }
        };
        *state = ExtractorState::ListingsLoaded;

        let cap = self.config.listing_cap();
        self.emit(ScrapeEvent::ListingsFound {
            source,
            count: listings.len(),
            cap,
        });

        let mut records = Vec::with_capacity(cap.min(listings.len()));
        for (index, listing) in listings.iter().take(cap).enumerate() {
            let outcome = timeout(
                self.config.listing_timeout(),
                self.profile.extract(listing.as_ref()),
            )
            .await
            .unwrap_or(Err(ListingError::Timeout));

            match outcome {
                Ok(Listing::Product { record, normalized }) => {
                    if !normalized {
                        self.emit(ScrapeEvent::TitleNotNormalized {
                            source,
                            title: record.title.clone(),
                        });
                    }
                    records.push(record);
                }
                Ok(Listing::Sponsored) => {
                    self.emit(ScrapeEvent::SponsoredSkipped { source, index });
                }
                Err(e) => {
                    self.emit(ScrapeEvent::ListingSkipped {
                        source,
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        records
    }

    /// Poll for the first listing container until the wait timeout
    ///
    /// A single lookup never outlives the remaining wait.
    async fn wait_for_listings(&self, session: &mut dyn BrowserSession) -> bool {
        let selector = self.profile.listing_selector;
        let wait = self.config.listing_wait_timeout();
        let started = Instant::now();

        loop {
            let remaining = wait.saturating_sub(started.elapsed());
            if let Ok(true) = timeout(remaining, session.has_element(selector)).await {
                return true;
            }

            if started.elapsed() >= wait {
                self.emit(ScrapeEvent::ListingWaitTimedOut {
                    source: self.source(),
                    selector: selector.to_string(),
                    waited: started.elapsed(),
                });
                return false;
            }

            sleep(self.config.poll_interval()).await;
        }
    }
}
