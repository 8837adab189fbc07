use shelfprice_core::{FetchResult, ProductRecord, RecordId, Store, StoreSource};

use crate::error::CatalogError;
use crate::filter::PriceFilter;
use crate::loader::load_store_csv;
use crate::schema::StoreSchema;
use crate::summary::StoreSummary;

/// One store's records, or the reason they could not be loaded.
#[derive(Debug)]
struct StoreTable {
    store: Store,
    records: Vec<ProductRecord>,
    unavailable_reason: Option<String>,
}

/// Outcome of [`Catalog::load_all`]: per-store record counts for the stores
/// that loaded, and the errors for those that did not.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<(Store, usize)>,
    pub failures: Vec<CatalogError>,
}

impl LoadReport {
    #[must_use]
    pub fn total_records(&self) -> usize {
        self.loaded.iter().map(|(_, n)| n).sum()
    }
}

/// Owned in-memory table of every loaded store's records.
///
/// Stores keep the order they were loaded in and records keep file order,
/// so [`Catalog::query`] results are stable across calls.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Vec<StoreTable>,
}

impl Catalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every configured store independently.
    ///
    /// A store whose source cannot be read is logged, recorded in the
    /// report, and registered as unavailable with zero records. It never
    /// prevents the remaining stores from loading.
    #[must_use]
    pub fn load_all(sources: &[StoreSource]) -> (Self, LoadReport) {
        let mut catalog = Self::new();
        let mut report = LoadReport::default();

        for source in sources {
            let schema = StoreSchema::for_source(source);
            match load_store_csv(&source.csv_path, source.store, &schema) {
                Ok(records) => {
                    tracing::info!(
                        store = %source.store,
                        path = %source.csv_path.display(),
                        count = records.len(),
                        "loaded store catalog"
                    );
                    report.loaded.push((source.store, records.len()));
                    catalog.replace_store(source.store, records);
                }
                Err(e) => {
                    tracing::warn!(store = %source.store, error = %e, "store catalog unavailable");
                    catalog.mark_unavailable(source.store, e.to_string());
                    report.failures.push(e);
                }
            }
        }

        (catalog, report)
    }

    /// Replaces all records for `store`. A store seen for the first time is
    /// appended after the existing ones.
    pub fn replace_store(&mut self, store: Store, records: Vec<ProductRecord>) {
        let table = self.table_mut(store);
        table.records = records;
        table.unavailable_reason = None;
    }

    /// Registers `store` as having no data, dropping any records it had.
    pub fn mark_unavailable(&mut self, store: Store, reason: impl Into<String>) {
        let table = self.table_mut(store);
        table.records.clear();
        table.unavailable_reason = Some(reason.into());
    }

    /// Stores known to the catalog, in load order.
    pub fn stores(&self) -> impl Iterator<Item = Store> + '_ {
        self.tables.iter().map(|t| t.store)
    }

    /// `Some(reason)` when `store` failed to load.
    #[must_use]
    pub fn unavailable_reason(&self, store: Store) -> Option<&str> {
        self.table(store)
            .and_then(|t| t.unavailable_reason.as_deref())
    }

    #[must_use]
    pub fn is_available(&self, store: Store) -> bool {
        self.table(store)
            .is_some_and(|t| t.unavailable_reason.is_none())
    }

    #[must_use]
    pub fn records_for(&self, store: Store) -> &[ProductRecord] {
        self.table(store)
            .map(|t| t.records.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.iter().map(|t| t.records.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&ProductRecord> {
        self.records_for(id.store).iter().find(|r| r.id == id)
    }

    /// Records matching `filter`, in load order.
    #[must_use]
    pub fn query(&self, filter: &PriceFilter) -> Vec<&ProductRecord> {
        self.tables
            .iter()
            .filter(|t| filter.includes_store(t.store))
            .flat_map(|t| t.records.iter())
            .filter(|r| filter.matches(r))
            .collect()
    }

    /// Per-store statistics over the records matching `filter`. Every store
    /// selected by the filter appears, including unavailable ones.
    #[must_use]
    pub fn summary(&self, filter: &PriceFilter) -> Vec<StoreSummary> {
        self.tables
            .iter()
            .filter(|t| filter.includes_store(t.store))
            .map(|t| {
                StoreSummary::from_records(
                    t.store,
                    t.unavailable_reason.is_none(),
                    t.records.iter().filter(|r| filter.matches(r)),
                )
            })
            .collect()
    }

    /// Writes a successful live fetch back into its record.
    ///
    /// Returns `true` if a price was written. Failed fetches and results for
    /// records no longer in the catalog leave it untouched.
    pub fn apply_fetch_result(&mut self, result: &FetchResult) -> bool {
        let Some(price) = result.price() else {
            return false;
        };

        let Some(record) = self
            .tables
            .iter_mut()
            .find(|t| t.store == result.id.store)
            .and_then(|t| t.records.iter_mut().find(|r| r.id == result.id))
        else {
            tracing::debug!(id = %result.id, "fetch result for unknown record ignored");
            return false;
        };

        record.set_live_price(price);
        true
    }

    fn table(&self, store: Store) -> Option<&StoreTable> {
        self.tables.iter().find(|t| t.store == store)
    }

    fn table_mut(&mut self, store: Store) -> &mut StoreTable {
        let idx = match self.tables.iter().position(|t| t.store == store) {
            Some(idx) => idx,
            None => {
                self.tables.push(StoreTable {
                    store,
                    records: Vec::new(),
                    unavailable_reason: None,
                });
                self.tables.len() - 1
            }
        };
        &mut self.tables[idx]
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
