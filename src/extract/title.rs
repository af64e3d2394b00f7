//! Canonical `Model (Color, N GB)` titles
//!
//! Sites phrase storage and RAM differently: `"Galaxy S21 (8GB RAM, 128GB,
//! Phantom Black)"`, `"Redmi 12 (128GB, Jade Black)"`. When two capacities
//! are present the second one is storage and is the one reported.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::constants::UNKNOWN_COLOR;

static CAPACITY_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?)\s*\((\d+)GB(?:\s*RAM)?(?:,\s*(\d+)GB)?(?:,\s*(.+?))?\)")
        .expect("CAPACITY_TITLE: hardcoded regex is valid")
});

/// Result of title normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTitle {
    pub text: String,
    /// `false` when the raw title was kept as-is
    pub matched: bool,
}

/// Rewrite a listing title into `Model (Color, N GB)` when it carries a
/// capacity group; otherwise return it trimmed and unmatched.
#[must_use]
pub fn normalize_title(raw: &str) -> NormalizedTitle {
    let trimmed = raw.trim();

    let Some(caps) = CAPACITY_TITLE.captures(trimmed) else {
        return NormalizedTitle {
            text: trimmed.to_string(),
            matched: false,
        };
    };

    let model = caps.get(1).map_or("", |m| m.as_str().trim());
    let capacity = caps
        .get(3)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str());
    let color = caps
        .get(4)
        .map(|m| m.as_str().trim())
        .filter(|c| !c.is_empty())
        .unwrap_or(UNKNOWN_COLOR);

    NormalizedTitle {
        text: format!("{model} ({color}, {capacity} GB)"),
        matched: true,
    }
}
