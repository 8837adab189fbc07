//! Live price fetching for product pages.
//!
//! A [`LiveFetcher`] opens one exclusively-owned page session per product via
//! a [`BrowserLauncher`], navigates to the product URL, and hands the
//! rendered page to the store's [`PriceExtractor`]. Every outcome is reported
//! as a [`shelfprice_core::FetchResult`]; nothing here panics or aborts a
//! batch.

pub mod error;
pub mod extract;
pub mod fetcher;
pub mod profile;
pub(crate) mod rate_limit;
pub mod session;

pub use error::{ExtractError, FetchError};
pub use extract::{
    extractor_for, ExtractionRule, PatternGroup, PriceExtractor, SelectorGroup, Strategy,
};
pub use fetcher::{FetchSettings, LiveFetcher, StoreFetchConfig};
pub use profile::EngineProfile;
pub use session::{BrowserLauncher, HttpBrowser, HttpPageSession, PageSession};
