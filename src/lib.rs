//! Product search aggregation across e-commerce result pages
//!
//! Drives one headless Chrome session per source, pulls the first few
//! listings off each results page through per-field fallback chains,
//! normalizes them into `ProductRecord`s, and merges the relevant ones in a
//! configured source order.

pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod error;
pub mod extract;
pub mod extractor;
pub mod http;
pub mod model;
pub mod observer;
pub mod orchestrator;
pub mod relevance;
pub mod session;
pub mod sources;
pub mod utils;

pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{BrowserOptions, ScrapeConfig, ScrapeConfigBuilder};
pub use error::{ListingError, ScrapeError, SearchError, SessionError};
pub use extractor::{ExtractorState, SourceExtractor};
pub use model::{ProductRecord, Rating, Source};
pub use observer::{NullObserver, ScrapeEvent, ScrapeObserver, TracingObserver};
pub use orchestrator::Aggregator;
pub use relevance::is_relevant;
pub use session::{
    BrowserSession, ChromeSessionFactory, ListingHandle, SessionFactory, SnapshotSessionFactory,
};
