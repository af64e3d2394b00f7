//! Aggregated search across sources
//!
//! One extractor (and one session) per source per request. Every extractor
//! that was constructed is closed before `search` returns, whatever the
//! scrape did. If the `search` future itself is dropped, session `Drop`
//! impls tear the browsers down.
//!
//! The request timeout bounds the whole search. Concurrent sources share
//! one deadline. Sequential sources each get an even share of what is left
//! when their turn comes, so time a fast source does not use rolls over to
//! the ones after it and one hung site cannot starve the rest.

use futures::future::join_all;
use std::sync::Arc;
use tokio::time::{Instant, timeout_at};

use crate::config::ScrapeConfig;
use crate::error::{ScrapeError, SearchError};
use crate::extractor::SourceExtractor;
use crate::model::{ProductRecord, Source};
use crate::observer::{ScrapeEvent, ScrapeObserver, TracingObserver};
use crate::relevance::is_relevant;
use crate::session::SessionFactory;
use crate::utils::constants::MAX_QUERY_LENGTH;

#[derive(Clone)]
pub struct Aggregator {
    factory: Arc<dyn SessionFactory>,
    config: Arc<ScrapeConfig>,
    observer: Arc<dyn ScrapeObserver>,
}

impl Aggregator {
    /// Aggregator reporting to `TracingObserver`
    #[must_use]
    pub fn new(factory: Arc<dyn SessionFactory>, config: Arc<ScrapeConfig>) -> Self {
        Self {
            factory,
            config,
            observer: Arc::new(TracingObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn ScrapeObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Search every configured source for `query`
    ///
    /// Records are grouped by source in the configured order and keep each
    /// source's listing order. Only records whose title contains every query
    /// term are returned. If any source fails outright the error carries
    /// the records gathered from the others.
    pub async fn search(&self, query: &str) -> Result<Vec<ProductRecord>, SearchError> {
        let query = validate_query(query)?;
        let deadline = Instant::now() + self.config.request_timeout();
        let order = self.config.source_order();

        let outcomes = if self.config.concurrent() {
            join_all(
                order
                    .iter()
                    .map(|source| self.run_source(*source, query, deadline)),
            )
            .await
        } else {
            let mut outcomes = Vec::with_capacity(order.len());
            for (index, source) in order.iter().enumerate() {
                let left = u32::try_from(order.len() - index).unwrap_or(u32::MAX);
                let now = Instant::now();
                let share = deadline.saturating_duration_since(now) / left;
                outcomes.push(self.run_source(*source, query, now + share).await);
            }
            outcomes
        };

        let mut products = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(batch) => products.extend(batch),
                Err(e) => failures.push(e),
            }
        }

        if failures.is_empty() {
            Ok(products)
        } else {
            Err(SearchError::Aggregate {
                failures,
                partial: products,
            })
        }
    }

    /// Construct, scrape, close, filter
    ///
    /// Running out of time is never a failure: the source just contributes
    /// nothing. A source whose deadline has already passed is skipped
    /// without acquiring a session.
    async fn run_source(
        &self,
        source: Source,
        query: &str,
        deadline: Instant,
    ) -> Result<Vec<ProductRecord>, ScrapeError> {
        if Instant::now() >= deadline {
            self.observer
                .on_event(&ScrapeEvent::DeadlineExceeded { source });
            return Ok(Vec::new());
        }

        let constructed = timeout_at(
            deadline,
            SourceExtractor::construct(
                source,
                self.factory.as_ref(),
                self.config.clone(),
                self.observer.clone(),
            ),
        )
        .await;

        let mut extractor = match constructed {
            Ok(extractor) => extractor?,
            Err(_) => {
                self.observer
                    .on_event(&ScrapeEvent::DeadlineExceeded { source });
                return Ok(Vec::new());
            }
        };

        let scraped = timeout_at(deadline, extractor.scrape(query)).await;
        extractor.close().await;

        let batch = match scraped {
            Ok(result) => result?,
            Err(_) => {
                self.observer
                    .on_event(&ScrapeEvent::DeadlineExceeded { source });
                Vec::new()
            }
        };

        let before = batch.len();
        let kept: Vec<ProductRecord> = batch
            .into_iter()
            .filter(|record| is_relevant(record, query))
            .collect();

        self.observer.on_event(&ScrapeEvent::RelevanceFiltered {
            source,
            kept: kept.len(),
            dropped: before - kept.len(),
        });

        Ok(kept)
    }
}

/// Trimmed query, or the caller error it amounts to
pub fn validate_query(query: &str) -> Result<&str, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let len = query.chars().count();
    if len > MAX_QUERY_LENGTH {
        return Err(SearchError::QueryTooLong {
            len,
            max: MAX_QUERY_LENGTH,
        });
    }

    Ok(query)
}
