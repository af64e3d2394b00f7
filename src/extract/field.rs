//! Ordered-fallback field extraction
//!
//! Result page markup drifts constantly, so every field carries a list of
//! locator strategies. The first strategy that yields a usable value wins.

use crate::session::ListingHandle;

/// What to read from the matched element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// Rendered text
    Text,
    /// Named attribute
    Attribute(&'static str),
}

/// Selector scoped to a listing container, plus what to read from it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatorStrategy {
    pub selector: &'static str,
    pub rule: Extraction,
}

impl LocatorStrategy {
    #[must_use]
    pub const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            rule: Extraction::Text,
        }
    }

    #[must_use]
    pub const fn attr(selector: &'static str, name: &'static str) -> Self {
        Self {
            selector,
            rule: Extraction::Attribute(name),
        }
    }

    /// Trimmed, non-empty value or `None`
    pub async fn read(&self, listing: &dyn ListingHandle) -> Option<String> {
        let raw = match self.rule {
            Extraction::Text => listing.text(self.selector).await,
            Extraction::Attribute(name) => listing.attribute(self.selector, name).await,
        }?;

        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// First non-empty value across `strategies`
///
/// Strategy failures are swallowed; `None` only when every strategy failed.
pub async fn extract_field(
    listing: &dyn ListingHandle,
    strategies: &[LocatorStrategy],
) -> Option<String> {
    for strategy in strategies {
        if let Some(value) = strategy.read(listing).await {
            return Some(value);
        }
    }
    None
}

/// First value across `strategies` that also survives `parse`
///
/// A strategy whose raw value does not parse counts as failed, so later
/// strategies still get their turn.
pub async fn extract_parsed<T>(
    listing: &dyn ListingHandle,
    strategies: &[LocatorStrategy],
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    for strategy in strategies {
        if let Some(value) = strategy.read(listing).await.as_deref().and_then(&parse) {
            return Some(value);
        }
    }
    None
}
