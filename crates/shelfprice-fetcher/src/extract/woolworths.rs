use shelfprice_core::Store;

use super::rule::{ExtractionRule, PatternGroup, SelectorGroup, Strategy, COMMON_REJECTED_WORDS};
use super::PriceExtractor;

/// Plausible band for a single current shelf price, in cents. Anything
/// outside it on a product page is a multi-buy total or a unit price.
const CURRENT_PRICE_BAND: Option<(i64, i64)> = Some((150, 600));

static RULE: ExtractionRule = ExtractionRule {
    strategies: &[
        Strategy::Selectors(SelectorGroup {
            selectors: &[
                ".product-price_component_price-lead__vlm8f",
                r#"div[class*="price-lead"]"#,
                r#"div[class*="product-price_component_price-lead"]"#,
            ],
            max_text_len: 20,
            rejected_words: COMMON_REJECTED_WORDS,
            required_text: None,
            band_cents: CURRENT_PRICE_BAND,
        }),
        Strategy::Selectors(SelectorGroup {
            selectors: &[
                r#"div[class*="product-price_component_price-container"] div[class*="price-lead"]"#,
                r#"div[class*="price-container"] div[class*="price-lead"]"#,
                r#"div[class*="product-price_component_price-container"]"#,
            ],
            max_text_len: 30,
            rejected_words: COMMON_REJECTED_WORDS,
            required_text: None,
            band_cents: CURRENT_PRICE_BAND,
        }),
        // Screen-reader label, e.g. "Price $2.40".
        Strategy::Selectors(SelectorGroup {
            selectors: &["div.sr-only"],
            max_text_len: 30,
            rejected_words: COMMON_REJECTED_WORDS,
            required_text: Some("Price $"),
            band_cents: CURRENT_PRICE_BAND,
        }),
        Strategy::Selectors(SelectorGroup {
            selectors: &[
                r#"div[data-testid="price-unit"] span:not([style*="line-through"])"#,
                r#"div[class*="ProductPrice"] span:not([style*="line-through"]):not([class*="save"]):not([class*="was"])"#,
                r#"span[class*="sale"]:not([class*="was"]):not([class*="save"]):not([style*="line-through"])"#,
                r#"div[class*="price-container"] span:not([style*="line-through"]):not([class*="was"])"#,
                r#"span[class*="current"]:not([class*="was"]):not([class*="save"]):not([style*="line-through"])"#,
                r#"span[class*="price"]:not([style*="line-through"]):not([class*="was"]):not([class*="save"]):not([class*="strike"])"#,
            ],
            max_text_len: 25,
            rejected_words: &["was", "save", "off", "/"],
            required_text: None,
            band_cents: CURRENT_PRICE_BAND,
        }),
        Strategy::Source(PatternGroup {
            patterns: &[
                r#""salePrice":\s*"?\$?(\d+\.?\d*)"?"#,
                r#""currentPrice":\s*"?\$?(\d+\.?\d*)"?"#,
                r#""price":\s*"?\$?(\d+\.?\d*)"?"#,
                r#""displayPrice":\s*"?\$?(\d+\.?\d*)"?"#,
            ],
            band_cents: CURRENT_PRICE_BAND,
        }),
        Strategy::Selectors(SelectorGroup {
            selectors: &["span"],
            max_text_len: 30,
            rejected_words: &["/", "per", "save", "off"],
            required_text: None,
            band_cents: CURRENT_PRICE_BAND,
        }),
    ],
};

/// Woolworths product pages. Promotions render the old price alongside the
/// current one, so every strategy is limited to a single-item price band.
#[derive(Debug, Clone, Copy)]
pub struct WoolworthsExtractor;

impl PriceExtractor for WoolworthsExtractor {
    fn store(&self) -> Store {
        Store::Woolworths
    }

    fn rule(&self) -> &ExtractionRule {
        &RULE
    }
}
