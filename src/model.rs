//! Normalized product records and the source enum.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::utils::constants::{IN_STOCK, UNAVAILABLE};

/// E-commerce site a record was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    Croma,
    Amazon,
    Flipkart,
}

impl Source {
    /// Every supported source, in the default scrape order
    pub const ALL: [Source; 3] = [Source::Croma, Source::Amazon, Source::Flipkart];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Croma => "Croma",
            Self::Amazon => "Amazon",
            Self::Flipkart => "Flipkart",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "croma" => Ok(Self::Croma),
            "amazon" => Ok(Self::Amazon),
            "flipkart" => Ok(Self::Flipkart),
            other => Err(format!("unknown source '{other}'")),
        }
    }
}

/// Star rating, or the explicit absence marker
///
/// Serializes as a JSON number or the string `"N/A"`, never `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Score(f64),
    Unavailable,
}

impl Rating {
    #[must_use]
    pub fn score(self) -> Option<f64> {
        match self {
            Self::Score(v) => Some(v),
            Self::Unavailable => None,
        }
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(v) => serializer.serialize_f64(*v),
            Self::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Rating {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Score(f64),
            Marker(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Score(v) if v.is_finite() && (0.0..=5.0).contains(&v) => Ok(Self::Score(v)),
            Wire::Score(v) => Err(serde::de::Error::custom(format!(
                "rating {v} outside [0, 5]"
            ))),
            Wire::Marker(s) if s == UNAVAILABLE => Ok(Self::Unavailable),
            Wire::Marker(s) => Err(serde::de::Error::custom(format!(
                "expected a rating or \"{UNAVAILABLE}\", got \"{s}\""
            ))),
        }
    }
}

/// One search-result listing, normalized
///
/// Every field is always present. `price` is `0.0` when the listing price
/// could not be parsed, which is indistinguishable from a genuinely free
/// listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub title: String,
    pub price: f64,
    pub source: Source,
    pub link: String,
    pub stock: String,
    pub rating: Rating,
    pub image_url: String,
}

impl ProductRecord {
    /// Record with every optional field set to its absence marker
    #[must_use]
    pub fn new(source: Source, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: 0.0,
            source,
            link: UNAVAILABLE.to_string(),
            stock: IN_STOCK.to_string(),
            rating: Rating::Unavailable,
            image_url: UNAVAILABLE.to_string(),
        }
    }
}
