//! URL utilities for listing links and image sources.
//!
//! Result pages hand back a mix of absolute, protocol-relative and
//! site-relative `href`/`src` values. Records only ever carry absolute URLs.

use url::Url;

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
        }
        Err(_) => false,
    }
}

/// Resolve an attribute value against the page it was found on
///
/// Returns `None` for empty values, non-http schemes and anything `Url`
/// refuses to join.
#[must_use]
pub fn resolve_against(base: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if is_valid_url(raw) {
        return Some(raw.to_string());
    }

    let base = Url::parse(base).ok()?;
    let joined = base.join(raw).ok()?;
    matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
}
