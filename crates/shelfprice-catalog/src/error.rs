use shelfprice_core::Store;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("data unavailable for {store} ({path}): {reason}")]
    DataUnavailable {
        store: Store,
        path: String,
        reason: String,
    },
}

impl CatalogError {
    pub(crate) fn unavailable(store: Store, path: &str, reason: impl ToString) -> Self {
        CatalogError::DataUnavailable {
            store,
            path: path.to_owned(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn store(&self) -> Store {
        match self {
            CatalogError::DataUnavailable { store, .. } => *store,
        }
    }
}
