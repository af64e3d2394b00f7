//! Query relevance filter
//!
//! Result pages pad their first screen with accessories and "similar"
//! products. A record is kept only when its title contains every query term.

use crate::model::ProductRecord;
use crate::utils::constants::UNAVAILABLE;

/// Whether every whitespace-separated query term occurs in `title`
/// (case-insensitive substring match)
///
/// Empty and absent titles are never relevant.
#[must_use]
pub fn title_matches(title: &str, query: &str) -> bool {
    let title = title.trim();
    if title.is_empty() || title == UNAVAILABLE {
        return false;
    }

    let title = title.to_lowercase();
    query
        .to_lowercase()
        .split_whitespace()
        .all(|term| title.contains(term))
}

#[must_use]
pub fn is_relevant(record: &ProductRecord, query: &str) -> bool {
    title_matches(&record.title, query)
}
