//! croma.com

use super::{SPONSORED_MARKERS, SourceProfile};
use crate::extract::LocatorStrategy;
use crate::model::Source;

pub static PROFILE: SourceProfile = SourceProfile {
    source: Source::Croma,
    base_url: "https://www.croma.com/",
    search_url_template: "https://www.croma.com/searchB?q={query}%3Arelevance&text={query}",
    listing_selector: "div.cp-product",
    title: &[LocatorStrategy::text("h3.product-title a")],
    title_label: &[],
    title_ad_suffix: None,
    price: &[LocatorStrategy::text("span.amount")],
    link: &[LocatorStrategy::attr("h3.product-title a", "href")],
    rating: &[
        LocatorStrategy::text("span.rating-text"),
        LocatorStrategy::text("div.rating"),
    ],
    image: &[
        LocatorStrategy::attr("img", "src"),
        LocatorStrategy::attr("img", "data-src"),
    ],
    sponsored_markers: SPONSORED_MARKERS,
};
