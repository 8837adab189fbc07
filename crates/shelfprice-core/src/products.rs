use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::price::parse_image_url;
use crate::{RecordId, Store};

/// A product row from one store's catalog, normalized for comparison across
/// stores.
///
/// `price` and `image_url` are private so that "available" always means
/// "present": the availability flags are derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    pub store: Store,
    pub name: String,
    pub brand: Option<String>,
    price: Option<Decimal>,
    image_url: Option<String>,
    /// Product page on the store's website, if the export carried one.
    pub source_url: Option<String>,
}

impl ProductRecord {
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>) -> Self {
        Self {
            id,
            store: id.store,
            name: name.into(),
            brand: None,
            price: None,
            image_url: None,
            source_url: None,
        }
    }

    #[must_use]
    pub fn with_brand(mut self, brand: Option<String>) -> Self {
        self.brand = brand.filter(|b| !b.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Option<Decimal>) -> Self {
        self.price = price;
        self
    }

    /// Sets the image URL, mapping sentinels and blanks to "unavailable".
    #[must_use]
    pub fn with_image_url(mut self, raw: Option<&str>) -> Self {
        self.image_url = raw.and_then(parse_image_url);
        self
    }

    #[must_use]
    pub fn with_source_url(mut self, url: Option<String>) -> Self {
        self.source_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    #[must_use]
    pub fn price_available(&self) -> bool {
        self.price.is_some()
    }

    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    #[must_use]
    pub fn image_available(&self) -> bool {
        self.image_url.is_some()
    }

    /// Overwrites the price with a freshly fetched value. This is the only
    /// mutation a loaded record accepts.
    pub fn set_live_price(&mut self, price: Decimal) {
        self.price = Some(price);
    }
}

/// Step of a single live fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStage {
    Idle,
    BrowserLaunching,
    PageNavigating,
    PriceExtracting,
    Success,
    Failed,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FetchStage::Idle => "idle",
            FetchStage::BrowserLaunching => "browser_launching",
            FetchStage::PageNavigating => "page_navigating",
            FetchStage::PriceExtracting => "price_extracting",
            FetchStage::Success => "success",
            FetchStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Why a live fetch did not produce a price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchFailure {
    #[error("timed out while {stage}")]
    Timeout { stage: FetchStage },

    #[error("price element not found on page")]
    ElementNotFound,

    #[error("could not parse price from text: {text}")]
    Parse { text: String },

    #[error("network error: {message}")]
    Network { message: String },

    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("page served a bot challenge")]
    Blocked,

    #[error("no product URL available")]
    MissingUrl,

    #[error("failed to launch browser session: {message}")]
    BrowserLaunch { message: String },
}

/// Outcome of one live fetch. Exactly one of `price` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub id: RecordId,
    pub store: Store,
    pub source_url: Option<String>,
    price: Option<Decimal>,
    error: Option<FetchFailure>,
    pub fetched_at: DateTime<Utc>,
}

impl FetchResult {
    #[must_use]
    pub fn success(record: &ProductRecord, price: Decimal) -> Self {
        Self {
            id: record.id,
            store: record.store,
            source_url: record.source_url.clone(),
            price: Some(price),
            error: None,
            fetched_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn failure(record: &ProductRecord, error: FetchFailure) -> Self {
        Self {
            id: record.id,
            store: record.store,
            source_url: record.source_url.clone(),
            price: None,
            error: Some(error),
            fetched_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    #[must_use]
    pub fn error(&self) -> Option<&FetchFailure> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.price.is_some()
    }
}
