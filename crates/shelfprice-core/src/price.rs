//! Price and image field parsing shared by the CSV normalizer and the live
//! fetcher.
//!
//! Malformed input never errors: every parser returns `None` for values that
//! cannot be interpreted, and callers treat `None` as "unavailable".

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

/// Literal the exports use in place of a missing price.
pub const PRICE_SENTINEL: &str = "Price not available";

/// Literals the exports use in place of a missing image URL. Woolworths
/// exports write `Unknown`.
pub const IMAGE_SENTINELS: [&str; 2] = ["Image not available", "Unknown"];

/// Currency markers stripped from the front of a price field, longest first.
const CURRENCY_PREFIXES: [&str; 3] = ["AUD", "A$", "$"];

/// Plausible bounds for a price read from free page text, in cents.
const TEXT_PRICE_MIN_CENTS: i64 = 1;
const TEXT_PRICE_MAX_CENTS: i64 = 99_999;

/// Number patterns tried in order against page text. Each captures the
/// numeric part only.
static TEXT_PRICE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\$\s*(\d+(?:\.\d+)?)",
        r"(\d+(?:\.\d+)?)\s*\$",
        r"AUD\s*(\d+(?:\.\d+)?)",
        r"(\d+\.\d{2})",
        r"(\d+)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid price text regex"))
    .collect()
});

/// Parses a tabular price field such as `"$4.50"`, `" A$12 "`, or
/// `"$1,299.00"` into an exact decimal.
///
/// Returns `None` for the [`PRICE_SENTINEL`], empty strings, negative values,
/// and anything that does not parse as a decimal after the currency marker
/// and thousands separators are removed.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(PRICE_SENTINEL) {
        return None;
    }

    let without_currency = strip_currency(trimmed);
    let cleaned: String = without_currency
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let value = Decimal::from_str(&cleaned).ok()?;
    if value < Decimal::ZERO {
        return None;
    }
    Some(value)
}

/// Parses a price out of text scraped from a rendered page, e.g.
/// `"Price $2.40"` or `"\n  $3.00 each "`.
///
/// A clean field is tried with [`parse_price`] first. Otherwise the first
/// number matching one of the known price shapes and lying in
/// `0.01..=999.99` wins.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<Decimal> {
    let normalized = text.replace(['\n', '\t'], " ").replace(',', "");
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }

    if let Some(value) = parse_price(normalized).filter(|v| in_text_range(*v)) {
        return Some(value);
    }

    TEXT_PRICE_PATTERNS.iter().find_map(|re| {
        re.captures_iter(normalized)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| Decimal::from_str(m.as_str()).ok())
            .find(|v| in_text_range(*v))
    })
}

/// Parses an image URL field. Sentinels and blank values become `None`;
/// anything else is kept verbatim (reachability is not checked).
#[must_use]
pub fn parse_image_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || IMAGE_SENTINELS
            .iter()
            .any(|s| trimmed.eq_ignore_ascii_case(s))
    {
        return None;
    }
    Some(trimmed.to_owned())
}

fn strip_currency(value: &str) -> &str {
    CURRENCY_PREFIXES
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
        .map_or(value, str::trim_start)
}

fn in_text_range(value: Decimal) -> bool {
    (Decimal::new(TEXT_PRICE_MIN_CENTS, 2)..=Decimal::new(TEXT_PRICE_MAX_CENTS, 2)).contains(&value)
}

#[cfg(test)]
#[path = "price_test.rs"]
mod tests;
