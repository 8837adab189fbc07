//! CSV loading for one store's export.

use std::io::Read;
use std::path::Path;

use shelfprice_core::{ProductRecord, RecordId, Store};

use crate::error::CatalogError;
use crate::normalize::{normalize, RawRow};
use crate::schema::StoreSchema;

/// Loads and normalizes every row of `store`'s CSV export at `path`.
///
/// Rows are returned in file order. Rows that the CSV reader cannot decode,
/// and rows without a product name, are skipped with a warning; their row
/// index is not reused, so ids stay aligned with the file.
///
/// # Errors
///
/// Returns [`CatalogError::DataUnavailable`] if the file cannot be opened,
/// has no readable header row, or has none of the schema's name columns.
pub fn load_store_csv(
    path: &Path,
    store: Store,
    schema: &StoreSchema,
) -> Result<Vec<ProductRecord>, CatalogError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path)
        .map_err(|e| CatalogError::unavailable(store, &display, e))?;
    load_store_reader(file, &display, store, schema)
}

/// Same as [`load_store_csv`] for an arbitrary reader. `origin` names the
/// source in errors and logs.
///
/// # Errors
///
/// Returns [`CatalogError::DataUnavailable`] if the header row cannot be read
/// or has none of the schema's name columns.
pub fn load_store_reader<R: Read>(
    reader: R,
    origin: &str,
    store: Store,
    schema: &StoreSchema,
) -> Result<Vec<ProductRecord>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()
        .map_err(|e| CatalogError::unavailable(store, origin, e))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
        .collect();

    if !schema
        .name_columns
        .iter()
        .any(|c| headers.iter().any(|h| h == c))
    {
        return Err(CatalogError::unavailable(
            store,
            origin,
            format!(
                "no product name column (expected one of: {})",
                schema.name_columns.join(", ")
            ),
        ));
    }

    let mut records = Vec::new();
    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(%store, origin, row, error = %e, "skipping unreadable CSV row");
                continue;
            }
        };

        let raw = RawRow::from_pairs(headers.iter().zip(record.iter()));
        let product = normalize(&raw, schema, RecordId::new(store, row));
        if product.name.is_empty() {
            tracing::warn!(%store, origin, row, "skipping CSV row without a product name");
            continue;
        }
        records.push(product);
    }

    tracing::debug!(%store, origin, count = records.len(), "loaded store catalog");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rust_decimal::Decimal;

    use super::*;

    const IGA_CSV: &str = "\
product_name,brand,price,image_url,product_url
Coca-Cola Classic 1.25L,Coca-Cola,$3.50,https://cdn.example.com/a.jpg,https://www.igashop.com.au/product/a
Sprite 2L,Sprite,Price not available,Image not available,
,Coca-Cola,$1.00,,
Fanta 1.25L,Fanta,$2.95,,https://www.igashop.com.au/product/c
";

    fn load_str(csv: &str, store: Store) -> Result<Vec<ProductRecord>, CatalogError> {
        load_store_reader(csv.as_bytes(), "inline", store, &StoreSchema::for_store(store))
    }

    #[test]
    fn loads_rows_in_file_order() {
        let records = load_str(IGA_CSV, Store::Iga).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Coca-Cola Classic 1.25L", "Sprite 2L", "Fanta 1.25L"]);
    }

    #[test]
    fn skipped_rows_keep_row_ids_aligned() {
        let records = load_str(IGA_CSV, Store::Iga).unwrap();
        assert_eq!(records[2].id, RecordId::new(Store::Iga, 3));
    }

    #[test]
    fn sentinel_values_become_unavailable() {
        let records = load_str(IGA_CSV, Store::Iga).unwrap();
        let sprite = &records[1];
        assert!(!sprite.price_available());
        assert!(!sprite.image_available());
        assert!(sprite.source_url.is_none());
        assert_eq!(records[0].price(), Some(Decimal::new(350, 2)));
    }

    #[test]
    fn coles_layout_loads_without_brand_column() {
        let csv = "name,price,imageURL,productURL\n\
                   Coca-Cola 1.25L,$4.50,Image not available,https://www.coles.com.au/product/x\n";
        let records = load_str(csv, Store::Coles).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].brand.is_none());
        assert!(!records[0].image_available());
        assert_eq!(records[0].price(), Some(Decimal::new(450, 2)));
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "product_name,brand,price,image_url\nCoke No Sugar 2L,Coca-Cola\n";
        let records = load_str(csv, Store::Woolworths).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].price().is_none());
    }

    #[test]
    fn missing_name_column_is_data_unavailable() {
        let err = load_str("sku,price\n1,$2.00\n", Store::Iga).unwrap_err();
        assert!(matches!(err, CatalogError::DataUnavailable { store: Store::Iga, .. }));
    }

    #[test]
    fn malformed_header_is_data_unavailable() {
        let bytes: &[u8] = b"product_\xff\xfename,price\nCoca-Cola 2L,$3.00\n";
        let schema = StoreSchema::for_store(Store::Woolworths);
        let err = load_store_reader(bytes, "bad.csv", Store::Woolworths, &schema).unwrap_err();
        let CatalogError::DataUnavailable { store, path, .. } = err;
        assert_eq!(store, Store::Woolworths);
        assert_eq!(path, "bad.csv");
    }

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = load_store_csv(
            Path::new("/nonexistent/coles.csv"),
            Store::Coles,
            &StoreSchema::for_store(Store::Coles),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DataUnavailable { store: Store::Coles, .. }));
    }

    #[test]
    fn loads_from_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("woolworths.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"product_name,brand,price,image_url\nCoca-Cola Vanilla 1.25L,Coca-Cola,$2.40,Unknown\n")
            .unwrap();

        let records = load_store_csv(
            &path,
            Store::Woolworths,
            &StoreSchema::for_store(Store::Woolworths),
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].price(), Some(Decimal::new(240, 2)));
        assert!(!records[0].image_available());
    }
}
