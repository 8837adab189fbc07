use std::collections::HashMap;
use std::sync::{LazyLock, Mutex, PoisonError};

use regex::Regex;
use rust_decimal::Decimal;
use scraper::{Html, Selector};
use shelfprice_core::{parse_price, parse_price_text};

use crate::error::ExtractError;

/// Words that mark a price as something other than the current shelf price:
/// strike-through "was" prices, savings badges, and unit prices.
pub const COMMON_REJECTED_WORDS: &[&str] = &["was", "save", "/"];

/// CSS selectors tried in order, with the filters a matched element's text
/// must pass before it is parsed.
#[derive(Debug, Clone, Copy)]
pub struct SelectorGroup {
    pub selectors: &'static [&'static str],
    /// Trimmed text must be shorter than this many characters.
    pub max_text_len: usize,
    /// Case-insensitive substrings that disqualify an element.
    pub rejected_words: &'static [&'static str],
    /// Substring the text must contain, e.g. `"Price $"` for screen-reader
    /// labels.
    pub required_text: Option<&'static str>,
    /// Inclusive plausible price band in cents.
    pub band_cents: Option<(i64, i64)>,
}

/// Regexes run over the raw page source. Capture group 1 is the number.
#[derive(Debug, Clone, Copy)]
pub struct PatternGroup {
    pub patterns: &'static [&'static str],
    pub band_cents: Option<(i64, i64)>,
}

#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    Selectors(SelectorGroup),
    Source(PatternGroup),
}

/// Ordered extraction strategies for one store. The first strategy that
/// yields an in-band price wins.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRule {
    pub strategies: &'static [Strategy],
}

impl ExtractionRule {
    /// Runs every strategy against `html` in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Unparsable`] with the last candidate text when
    /// elements passed the filters but none parsed, and
    /// [`ExtractError::NotFound`] when nothing matched at all.
    pub fn apply(&self, html: &str) -> Result<Decimal, ExtractError> {
        let document = Html::parse_document(html);
        let mut unparsed: Option<String> = None;

        for strategy in self.strategies {
            let found = match strategy {
                Strategy::Selectors(group) => group.find(&document, &mut unparsed),
                Strategy::Source(group) => group.find(html),
            };
            if let Some(price) = found {
                return Ok(price);
            }
        }

        Err(match unparsed {
            Some(text) => ExtractError::Unparsable { text },
            None => ExtractError::NotFound,
        })
    }
}

impl SelectorGroup {
    fn find(&self, document: &Html, unparsed: &mut Option<String>) -> Option<Decimal> {
        for raw in self.selectors {
            let Ok(selector) = Selector::parse(raw) else {
                tracing::debug!(selector = raw, "unsupported selector skipped");
                continue;
            };

            for element in document.select(&selector) {
                let text = element.text().collect::<String>();
                let text = text.trim();
                if !self.accepts_text(text) {
                    continue;
                }

                match parse_price_text(text) {
                    Some(price) if in_band(price, self.band_cents) => {
                        tracing::debug!(selector = raw, text, %price, "price element matched");
                        return Some(price);
                    }
                    Some(_) => {}
                    None => *unparsed = Some(text.to_owned()),
                }
            }
        }
        None
    }

    fn accepts_text(&self, text: &str) -> bool {
        if !text.contains('$') || text.chars().count() >= self.max_text_len {
            return false;
        }
        if self.required_text.is_some_and(|needle| !text.contains(needle)) {
            return false;
        }
        let lowered = text.to_lowercase();
        !self.rejected_words.iter().any(|w| lowered.contains(w))
    }
}

impl PatternGroup {
    fn find(&self, html: &str) -> Option<Decimal> {
        for &raw in self.patterns {
            let Some(re) = compiled_pattern(raw) else {
                continue;
            };

            let found = re
                .captures_iter(html)
                .filter_map(|caps| caps.get(1))
                .filter_map(|m| parse_price(m.as_str()))
                .find(|price| {
                    *price > Decimal::ZERO && in_band(*price, self.band_cents)
                });
            if let Some(price) = found {
                tracing::debug!(pattern = raw, %price, "price found in page source");
                return Some(price);
            }
        }
        None
    }
}

/// Source patterns compiled on first use. Invalid patterns are cached as
/// `None` so the warning is logged once.
static PATTERN_CACHE: LazyLock<Mutex<HashMap<&'static str, Option<Regex>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

fn compiled_pattern(raw: &'static str) -> Option<Regex> {
    let mut cache = PATTERN_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    cache
        .entry(raw)
        .or_insert_with(|| match Regex::new(raw) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = raw, error = %e, "invalid source pattern skipped");
                None
            }
        })
        .clone()
}

fn in_band(price: Decimal, band_cents: Option<(i64, i64)>) -> bool {
    band_cents.is_none_or(|(lo, hi)| (Decimal::new(lo, 2)..=Decimal::new(hi, 2)).contains(&price))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUP: SelectorGroup = SelectorGroup {
        selectors: &[".price"],
        max_text_len: 20,
        rejected_words: COMMON_REJECTED_WORDS,
        required_text: None,
        band_cents: None,
    };

    fn rule(strategies: &'static [Strategy]) -> ExtractionRule {
        ExtractionRule { strategies }
    }

    #[test]
    fn first_accepted_element_wins() {
        let html = r#"<span class="price">$0.36 / 100mL</span><span class="price">$4.50</span>"#;
        let price = rule(&[Strategy::Selectors(GROUP)]).apply(html).unwrap();
        assert_eq!(price, Decimal::new(450, 2));
    }

    #[test]
    fn long_text_is_ignored() {
        let html = r#"<span class="price">Buy two for only $7.00 this week</span>"#;
        assert_eq!(
            rule(&[Strategy::Selectors(GROUP)]).apply(html),
            Err(ExtractError::NotFound)
        );
    }

    #[test]
    fn unparsable_candidate_is_reported() {
        let html = r#"<span class="price">$ TBA</span>"#;
        assert_eq!(
            rule(&[Strategy::Selectors(GROUP)]).apply(html),
            Err(ExtractError::Unparsable {
                text: "$ TBA".to_owned()
            })
        );
    }

    #[test]
    fn band_skips_implausible_prices() {
        const BANDED: SelectorGroup = SelectorGroup {
            band_cents: Some((150, 600)),
            ..GROUP
        };
        let html = r#"<span class="price">$42.00</span><span class="price">$2.40</span>"#;
        let price = rule(&[Strategy::Selectors(BANDED)]).apply(html).unwrap();
        assert_eq!(price, Decimal::new(240, 2));
    }

    #[test]
    fn source_patterns_run_after_selectors_miss() {
        const SOURCE: PatternGroup = PatternGroup {
            patterns: &[r#""price":\s*"?\$?(\d+\.?\d*)"?"#],
            band_cents: Some((50, 20_000)),
        };
        let html = r#"<script>{"price": 0.10, "other": 1}{"price": "5.25"}</script>"#;
        let price = rule(&[Strategy::Selectors(GROUP), Strategy::Source(SOURCE)])
            .apply(html)
            .unwrap();
        assert_eq!(price, Decimal::new(525, 2));
    }

    #[test]
    fn required_text_must_be_present() {
        const LABEL: SelectorGroup = SelectorGroup {
            selectors: &["div.sr-only"],
            required_text: Some("Price $"),
            ..GROUP
        };
        let html = r#"<div class="sr-only">Unit $1.92</div><div class="sr-only">Price $2.40</div>"#;
        let price = rule(&[Strategy::Selectors(LABEL)]).apply(html).unwrap();
        assert_eq!(price, Decimal::new(240, 2));
    }

    #[test]
    fn source_patterns_are_compiled_once_and_reused() {
        const PATTERN: &str = r"SKU-PRICE:(\d+\.\d{2})";
        const CACHED: PatternGroup = PatternGroup {
            patterns: &[PATTERN, r"(unclosed"],
            band_cents: None,
        };
        let strategies: &'static [Strategy] = &[Strategy::Source(CACHED)];

        let first = rule(strategies).apply("SKU-PRICE:3.10").unwrap();
        let compiled = compiled_pattern(PATTERN).unwrap();
        let second = rule(strategies).apply("SKU-PRICE:2.95").unwrap();

        assert_eq!(first, Decimal::new(310, 2));
        assert_eq!(second, Decimal::new(295, 2));
        assert_eq!(compiled.as_str(), PATTERN);
        let cache = PATTERN_CACHE.lock().unwrap();
        assert!(cache.get(PATTERN).is_some_and(Option::is_some));
        assert!(cache.get(r"(unclosed").is_some_and(Option::is_none));
    }
}
