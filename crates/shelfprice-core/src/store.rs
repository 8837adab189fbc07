use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A supermarket chain whose catalog is loaded and whose product pages can be
/// live-fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Coles,
    Iga,
    Woolworths,
}

impl Store {
    pub const ALL: [Store; 3] = [Store::Coles, Store::Iga, Store::Woolworths];

    /// Lowercase identifier used in record ids and config files.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Store::Coles => "coles",
            Store::Iga => "iga",
            Store::Woolworths => "woolworths",
        }
    }

    /// Browser engine used for live fetches unless the stores file overrides it.
    #[must_use]
    pub fn default_engine(self) -> BrowserEngine {
        match self {
            Store::Coles => BrowserEngine::Chromium,
            Store::Iga | Store::Woolworths => BrowserEngine::Firefox,
        }
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Store::Coles => write!(f, "Coles"),
            Store::Iga => write!(f, "IGA"),
            Store::Woolworths => write!(f, "Woolworths"),
        }
    }
}

impl FromStr for Store {
    type Err = CoreError;

    /// Case-insensitive; any name containing a store's slug resolves to that
    /// store (`"IGA Shop"` is IGA).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Store::ALL
            .into_iter()
            .find(|store| lower.contains(store.slug()))
            .ok_or_else(|| CoreError::UnknownStore(s.to_owned()))
    }
}

/// Rendering engine a page session emulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    Chromium,
    Firefox,
}

impl fmt::Display for BrowserEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserEngine::Chromium => write!(f, "chromium"),
            BrowserEngine::Firefox => write!(f, "firefox"),
        }
    }
}

impl FromStr for BrowserEngine {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(BrowserEngine::Chromium),
            "firefox" => Ok(BrowserEngine::Firefox),
            _ => Err(CoreError::UnknownEngine(s.to_owned())),
        }
    }
}

/// Synthetic record identifier: the store plus the 0-based data row within
/// that store's source file. Stable for the lifetime of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId {
    pub store: Store,
    pub row: usize,
}

impl RecordId {
    #[must_use]
    pub fn new(store: Store, row: usize) -> Self {
        Self { store, row }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.store.slug(), self.row)
    }
}

impl FromStr for RecordId {
    type Err = CoreError;

    /// Parses the `coles-3` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidRecordId {
            id: s.to_owned(),
            reason: reason.to_owned(),
        };

        let (store_part, row_part) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| invalid("expected <store>-<row>"))?;

        let store = Store::ALL
            .into_iter()
            .find(|store| store.slug().eq_ignore_ascii_case(store_part))
            .ok_or_else(|| invalid("unknown store prefix"))?;

        let row = row_part
            .parse::<usize>()
            .map_err(|e| invalid(&e.to_string()))?;

        Ok(Self { store, row })
    }
}
