//! flipkart.com
//!
//! Class names are build hashes and change with every redesign.

use super::{SPONSORED_MARKERS, SourceProfile};
use crate::extract::LocatorStrategy;
use crate::model::Source;

pub static PROFILE: SourceProfile = SourceProfile {
    source: Source::Flipkart,
    base_url: "https://www.flipkart.com/",
    search_url_template: "https://www.flipkart.com/search?q={query}",
    listing_selector: "div[data-id]",
    title: &[LocatorStrategy::text("div.KzDlHZ")],
    title_label: &[],
    title_ad_suffix: None,
    price: &[LocatorStrategy::text("div.Nx9bqj._4b5DiR")],
    link: &[LocatorStrategy::attr("a[href*='/p/']", "href")],
    rating: &[LocatorStrategy::text("div.XQDdHH")],
    image: &[LocatorStrategy::attr("img.DByuf4", "src")],
    sponsored_markers: SPONSORED_MARKERS,
};
