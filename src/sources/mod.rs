//! Per-source scraping profiles
//!
//! A `SourceProfile` is everything that differs between result pages:
//! the search URL, the listing container, and one fallback chain per
//! field. The extractor itself is source-agnostic.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ListingError;
use crate::extract::{
    LocatorStrategy, extract_field, extract_parsed, normalize_title, parse_price, parse_rating,
};
use crate::model::{ProductRecord, Rating, Source};
use crate::session::ListingHandle;
use crate::utils::resolve_against;

pub mod amazon;
pub mod croma;
pub mod flipkart;

/// Static description of one e-commerce results page
#[derive(Debug)]
pub struct SourceProfile {
    pub source: Source,
    /// Relative links and images are resolved against this
    pub base_url: &'static str,
    /// Search URL with `{query}` placeholders
    pub search_url_template: &'static str,
    /// One element per result card
    pub listing_selector: &'static str,
    pub title: &'static [LocatorStrategy],
    /// Accessible label of the title, used when cleanup leaves nothing useful
    pub title_label: &'static [LocatorStrategy],
    /// Tracking suffix some titles carry, stripped before normalization
    pub title_ad_suffix: Option<&'static LazyLock<Regex>>,
    pub price: &'static [LocatorStrategy],
    pub link: &'static [LocatorStrategy],
    pub rating: &'static [LocatorStrategy],
    pub image: &'static [LocatorStrategy],
    /// Substrings in the title or its label that mark an advertisement
    pub sponsored_markers: &'static [&'static str],
}

/// Markers shared by every source
pub(crate) const SPONSORED_MARKERS: &[&str] = &["Sponsored Ad"];

/// Profile for `source`
#[must_use]
pub fn profile(source: Source) -> &'static SourceProfile {
    match source {
        Source::Croma => &croma::PROFILE,
        Source::Amazon => &amazon::PROFILE,
        Source::Flipkart => &flipkart::PROFILE,
    }
}

/// What one listing container turned into
#[derive(Debug, Clone, PartialEq)]
pub enum Listing {
    Product {
        record: ProductRecord,
        /// Whether the title matched the canonical capacity pattern
        normalized: bool,
    },
    Sponsored,
}

impl SourceProfile {
    /// Results page URL for `query` (URL-encoded into every placeholder)
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        let encoded = urlencoding::encode(query.trim());
        self.search_url_template.replace("{query}", &encoded)
    }

    /// Extract one listing
    ///
    /// Only a missing title fails the listing. Every other field degrades to
    /// its absence marker.
    pub async fn extract(&self, listing: &dyn ListingHandle) -> Result<Listing, ListingError> {
        let label = if self.title_label.is_empty() {
            None
        } else {
            extract_field(listing, self.title_label).await
        };

        let raw = extract_field(listing, self.title).await;
        let title = match (raw, &label) {
            (Some(raw), _) => self.clean_title(raw, label.as_deref()),
            (None, Some(label)) => label.clone(),
            (None, None) => return Err(ListingError::MissingTitle),
        };

        if self.is_sponsored(&title, label.as_deref()) {
            return Ok(Listing::Sponsored);
        }

        let normalized = normalize_title(&title);
        let mut record = ProductRecord::new(self.source, normalized.text);

        if let Some(price) = extract_parsed(listing, self.price, parse_price).await {
            record.price = price;
        }

        if let Some(link) = extract_parsed(listing, self.link, |raw| {
            resolve_against(self.base_url, raw)
        })
        .await
        {
            record.link = link;
        }

        if let Some(score) = extract_parsed(listing, self.rating, parse_rating).await {
            record.rating = Rating::Score(score);
        }

        if let Some(image) = extract_parsed(listing, self.image, |raw| {
            resolve_against(self.base_url, raw)
        })
        .await
        {
            record.image_url = image;
        }

        Ok(Listing::Product {
            record,
            normalized: normalized.matched,
        })
    }

    /// Strip the ad suffix; fall back to the label if that changed nothing
    /// or left nothing
    fn clean_title(&self, raw: String, label: Option<&str>) -> String {
        let Some(suffix) = self.title_ad_suffix else {
            return raw;
        };

        let cleaned = suffix.replace(&raw, "");
        let cleaned = cleaned.trim();
        if cleaned.is_empty() || cleaned == raw {
            label.map_or(raw.clone(), str::to_string)
        } else {
            cleaned.to_string()
        }
    }

    fn is_sponsored(&self, title: &str, label: Option<&str>) -> bool {
        self.sponsored_markers.iter().any(|marker| {
            title.contains(marker) || label.is_some_and(|label| label.contains(marker))
        })
    }
}
