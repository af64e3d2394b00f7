//! Price and rating parsing

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?").expect("NUMBER: hardcoded regex is valid")
});

static STARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s+out\s+of\s+5\b")
        .expect("STARS: hardcoded regex is valid")
});

/// Numeric price from display text such as `"₹1,29,999"` or `"$ 12.50"`
///
/// Thousands separators are dropped and the first number is taken.
/// `None` when no digits remain.
#[must_use]
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let found = NUMBER.find(&cleaned)?;
    found.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Star rating from `"4.3"` or any text carrying `"4.3 out of 5"`
///
/// Accessible labels often wrap the score, as in
/// `"4.3 out of 5 stars, rating details"`. A bare number must be the whole
/// string. `None` for anything else, including scores outside [0, 5].
#[must_use]
pub fn parse_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let number = match STARS.captures(raw) {
        Some(caps) => caps.get(1)?.as_str(),
        None => raw,
    };

    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && (0.0..=5.0).contains(v))
}
