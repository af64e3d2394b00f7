//! Listing field extraction and normalization

pub mod field;
pub mod parse;
pub mod title;

pub use field::{Extraction, LocatorStrategy, extract_field, extract_parsed};
pub use parse::{parse_price, parse_rating};
pub use title::{NormalizedTitle, normalize_title};
