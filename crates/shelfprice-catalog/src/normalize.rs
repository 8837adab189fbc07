//! Normalization from raw export rows to [`ProductRecord`].
//!
//! Price and image parsing is delegated to [`shelfprice_core::price`]; this
//! module maps a store's column layout onto the canonical record.

use std::collections::HashMap;

use shelfprice_core::{parse_price, ProductRecord, RecordId};

use crate::schema::StoreSchema;

/// One data row keyed by lowercased, trimmed header name.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    /// Builds a row from `(header, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_lowercase(), v.into()))
            .collect();
        Self { fields }
    }

    /// First present value among `columns`, trimmed. Empty cells count as
    /// absent so that a later alias can still supply the field.
    fn first(&self, columns: &[&str]) -> Option<&str> {
        columns
            .iter()
            .filter_map(|c| self.fields.get(*c))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

/// Normalizes a raw export row into a [`ProductRecord`].
///
/// Never fails: an unparseable or sentinel price yields a record without a
/// price, a sentinel or blank image yields a record without an image, and
/// missing optional columns yield absent fields. A missing name becomes an
/// empty string; the loader decides whether to keep such rows.
#[must_use]
pub fn normalize(raw: &RawRow, schema: &StoreSchema, id: RecordId) -> ProductRecord {
    let name = raw.first(schema.name_columns).unwrap_or_default();

    let brand = raw
        .first(schema.brand_columns)
        .map(str::to_owned)
        .or_else(|| schema.default_brand.clone());

    let price = raw.first(schema.price_columns).and_then(parse_price);

    ProductRecord::new(id, name)
        .with_brand(brand)
        .with_price(price)
        .with_image_url(raw.first(schema.image_columns))
        .with_source_url(raw.first(schema.url_columns).map(str::to_owned))
}
