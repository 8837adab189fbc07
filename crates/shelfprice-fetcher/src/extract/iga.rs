use shelfprice_core::Store;

use super::rule::{ExtractionRule, PatternGroup, SelectorGroup, Strategy, COMMON_REJECTED_WORDS};
use super::PriceExtractor;

static RULE: ExtractionRule = ExtractionRule {
    strategies: &[
        Strategy::Selectors(SelectorGroup {
            selectors: &[
                r#"#product-details span[class*="price"]"#,
                "#product-details span",
                ".price",
                r#"[data-testid*="price"]"#,
                r#"span[class*="price"]"#,
                r#"div[class*="price"]"#,
                "span",
                ".product-price",
                r#"[class*="price"] span"#,
            ],
            max_text_len: 20,
            rejected_words: COMMON_REJECTED_WORDS,
            required_text: None,
            band_cents: None,
        }),
        Strategy::Source(PatternGroup {
            patterns: &[
                r"\$(\d+\.\d{2})",
                r"\$(\d+)",
                r"AUD\s*(\d+\.\d{2})",
            ],
            band_cents: Some((1, 99_999)),
        }),
    ],
};

/// IGA Shop Online product pages.
#[derive(Debug, Clone, Copy)]
pub struct IgaExtractor;

impl PriceExtractor for IgaExtractor {
    fn store(&self) -> Store {
        Store::Iga
    }

    fn rule(&self) -> &ExtractionRule {
        &RULE
    }
}
