use shelfprice_core::Store;

use super::rule::{ExtractionRule, PatternGroup, SelectorGroup, Strategy, COMMON_REJECTED_WORDS};
use super::PriceExtractor;

const HOME_PAGE: &str = "https://www.coles.com.au";

static RULE: ExtractionRule = ExtractionRule {
    strategies: &[
        Strategy::Selectors(SelectorGroup {
            selectors: &[
                r#"[data-testid="price-unit"]"#,
                r#"[data-testid="product-price"]"#,
                r#"[data-testid="price"]"#,
                r#"span[data-testid*="price"]"#,
                r#"div[data-testid*="price"]"#,
                r#"[class*="Price"]"#,
                r#"[class*="price"]"#,
            ],
            max_text_len: 50,
            rejected_words: COMMON_REJECTED_WORDS,
            required_text: None,
            band_cents: None,
        }),
        Strategy::Selectors(SelectorGroup {
            selectors: &["span, div, p, h1, h2, h3, h4, h5, h6"],
            max_text_len: 50,
            rejected_words: &["save", "off", "discount", "was", "rrp", "usual", "/"],
            required_text: None,
            band_cents: None,
        }),
        // Embedded product JSON.
        Strategy::Source(PatternGroup {
            patterns: &[
                r#"(?i)"price"[^}]*?"value":\s*"?(\d+\.?\d*)"?"#,
                r#"(?i)"displayPrice":\s*"?\$?(\d+\.?\d*)"?"#,
                r#"(?i)"currentPrice":\s*"?\$?(\d+\.?\d*)"?"#,
                r#"(?i)"pricing"[^}]*?"price":\s*"?\$?(\d+\.?\d*)"?"#,
                r"\$(\d+\.?\d*)",
            ],
            band_cents: Some((50, 20_000)),
        }),
        Strategy::Selectors(SelectorGroup {
            selectors: &[".price-section span", ".product-price span"],
            max_text_len: 50,
            rejected_words: &[],
            required_text: None,
            band_cents: None,
        }),
    ],
};

/// Coles product pages. Needs a home page visit first so the bot manager
/// issues its session cookies.
#[derive(Debug, Clone, Copy)]
pub struct ColesExtractor;

impl PriceExtractor for ColesExtractor {
    fn store(&self) -> Store {
        Store::Coles
    }

    fn rule(&self) -> &ExtractionRule {
        &RULE
    }

    fn warmup_url(&self) -> Option<&'static str> {
        Some(HOME_PAGE)
    }
}
