//! Configuration module for aggregated product searches
//!
//! This module provides the `ScrapeConfig` struct, its builder, and the
//! environment overlay used by the binary.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::ScrapeConfigBuilder;
pub use methods::parse_source_list;
pub use types::{BrowserOptions, ScrapeConfig};
