//! amazon.in
//!
//! Result titles sometimes carry a `_xxx yyy` tracking suffix, and the
//! `h2` accessible label is the more reliable title when they do not.
//! Sponsored cards say so in that label.

use regex::Regex;
use std::sync::LazyLock;

use super::{SPONSORED_MARKERS, SourceProfile};
use crate::extract::LocatorStrategy;
use crate::model::Source;

const TITLE_HEADING: &str = "h2.a-size-medium.a-color-base.a-text-normal";

static AD_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_\w+\s*\w+$").expect("AD_SUFFIX: hardcoded regex is valid")
});

pub static PROFILE: SourceProfile = SourceProfile {
    source: Source::Amazon,
    base_url: "https://www.amazon.in/",
    search_url_template: "https://www.amazon.in/s?k={query}",
    listing_selector: "div[data-component-type='s-search-result']",
    title: &[LocatorStrategy::text(
        "h2.a-size-medium.a-color-base.a-text-normal span",
    )],
    title_label: &[LocatorStrategy::attr(TITLE_HEADING, "aria-label")],
    title_ad_suffix: Some(&AD_SUFFIX),
    price: &[
        LocatorStrategy::text("span.a-price-whole"),
        LocatorStrategy::text("span.a-offscreen"),
    ],
    link: &[LocatorStrategy::attr("a.a-link-normal.s-no-outline", "href")],
    rating: &[
        LocatorStrategy::attr("a.a-popover-trigger.a-declarative", "aria-label"),
        LocatorStrategy::text("span.a-icon-alt"),
    ],
    image: &[LocatorStrategy::attr("img.s-image", "src")],
    sponsored_markers: SPONSORED_MARKERS,
};
