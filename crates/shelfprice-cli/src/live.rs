//! Live fetch commands. Both write successful prices back into the
//! in-memory catalog before printing.

use serde_json::json;
use shelfprice_catalog::{Catalog, PriceFilter};
use shelfprice_core::{ProductRecord, RecordId};
use shelfprice_fetcher::{BrowserLauncher, LiveFetcher};

use crate::output::{fmt_price, print_fetch_line, RecordView};

/// Fetch and apply the live price for one record.
///
/// # Errors
///
/// Returns an error if the record id is unknown or JSON serialization fails.
/// A failed fetch is printed, not returned as an error.
pub(crate) async fn run_fetch<B: BrowserLauncher>(
    catalog: &mut Catalog,
    fetcher: &LiveFetcher<B>,
    id: RecordId,
    json: bool,
) -> anyhow::Result<()> {
    let record = catalog
        .get(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("record '{id}' not found; run `list` to see ids"))?;

    let result = fetcher.fetch_price(&record).await;
    catalog.apply_fetch_result(&result);
    let updated = catalog.get(id).unwrap_or(&record);

    if json {
        let body = json!({
            "result": result,
            "record": RecordView::from(updated),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!("{} \u{2014} {}", record.id, record.name);
    match result.error() {
        None => println!(
            "live price {} (catalog had {})",
            fmt_price(result.price()),
            fmt_price(record.price())
        ),
        Some(error) => println!("fetch failed: {error}"),
    }
    Ok(())
}

/// Fetch live prices for every record matching `filter` and apply the
/// successful ones.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) async fn run_refresh<B: BrowserLauncher>(
    catalog: &mut Catalog,
    fetcher: &LiveFetcher<B>,
    filter: &PriceFilter,
    json: bool,
) -> anyhow::Result<()> {
    let targets: Vec<ProductRecord> = catalog.query(filter).into_iter().cloned().collect();
    if targets.is_empty() {
        println!("no products match the given filters");
        return Ok(());
    }

    let refs: Vec<&ProductRecord> = targets.iter().collect();
    let results = fetcher.fetch_all(&refs).await;

    let mut updated = 0usize;
    for result in &results {
        if catalog.apply_fetch_result(result) {
            updated += 1;
        }
    }

    if json {
        let body = json!({
            "results": results,
            "updated": updated,
            "total": results.len(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for result in &results {
        print_fetch_line(result);
    }
    println!("updated {updated}/{}", results.len());
    Ok(())
}
