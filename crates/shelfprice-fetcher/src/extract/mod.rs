//! Per-store price extraction from a loaded product page.

mod coles;
mod iga;
mod rule;
mod woolworths;

use rust_decimal::Decimal;
use shelfprice_core::Store;

use crate::error::ExtractError;

pub use coles::ColesExtractor;
pub use iga::IgaExtractor;
pub use rule::{ExtractionRule, PatternGroup, SelectorGroup, Strategy, COMMON_REJECTED_WORDS};
pub use woolworths::WoolworthsExtractor;

/// Store-specific knowledge of where a product page shows its price.
pub trait PriceExtractor: Send + Sync {
    fn store(&self) -> Store;

    fn rule(&self) -> &ExtractionRule;

    /// Page visited before the product page so the store's session cookies
    /// are set, if the store needs one.
    fn warmup_url(&self) -> Option<&'static str> {
        None
    }

    /// Finds the current shelf price in `html`.
    ///
    /// # Errors
    ///
    /// See [`ExtractionRule::apply`].
    fn extract(&self, html: &str) -> Result<Decimal, ExtractError> {
        self.rule().apply(html)
    }
}

/// Fixed store-to-extractor lookup.
#[must_use]
pub fn extractor_for(store: Store) -> &'static dyn PriceExtractor {
    match store {
        Store::Coles => &ColesExtractor,
        Store::Iga => &IgaExtractor,
        Store::Woolworths => &WoolworthsExtractor,
    }
}
