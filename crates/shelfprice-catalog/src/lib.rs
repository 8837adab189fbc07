//! In-memory product catalogs for the Coles, IGA, and Woolworths exports.
//!
//! CSV rows are normalized into [`shelfprice_core::ProductRecord`]s
//! ([`normalize`]), loaded per store ([`loader`]), and held in a
//! [`Catalog`] that answers filtered queries and accepts live price
//! write-backs. A store whose source cannot be read contributes no records
//! and is reported as unavailable; the other stores are unaffected.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod normalize;
pub mod schema;
pub mod summary;

pub use catalog::{Catalog, LoadReport};
pub use error::CatalogError;
pub use filter::{sort_records, PriceFilter, SortOrder};
pub use loader::{load_store_csv, load_store_reader};
pub use normalize::{normalize, RawRow};
pub use schema::StoreSchema;
pub use summary::StoreSummary;
