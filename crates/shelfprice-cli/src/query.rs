use shelfprice_catalog::{sort_records, Catalog, PriceFilter, SortOrder};

use crate::output::{fmt_price, print_record_table, RecordView};

/// Print the records matching `filter`, optionally sorted.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn run_list(
    catalog: &Catalog,
    filter: &PriceFilter,
    sort: Option<SortOrder>,
    json: bool,
) -> anyhow::Result<()> {
    let mut records = catalog.query(filter);
    if let Some(order) = sort {
        sort_records(&mut records, order);
    }

    if json {
        let views: Vec<RecordView<'_>> = records.iter().map(|r| RecordView::from(*r)).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("no products match the given filters");
        return Ok(());
    }
    print_record_table(&records);
    println!("{} product(s)", records.len());
    Ok(())
}

/// Print per-store statistics for the records matching `filter`.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub(crate) fn run_summary(catalog: &Catalog, filter: &PriceFilter, json: bool) -> anyhow::Result<()> {
    let summaries = catalog.summary(filter);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!(
        "{:<12}{:>10}{:>8}{:>10}{:>10}{:>10}",
        "STORE", "PRODUCTS", "PRICED", "MIN", "MAX", "MEAN"
    );
    for summary in &summaries {
        if !summary.available {
            let reason = catalog.unavailable_reason(summary.store).unwrap_or("unavailable");
            println!("{:<12}unavailable: {reason}", summary.store.to_string());
            continue;
        }
        println!(
            "{:<12}{:>10}{:>8}{:>10}{:>10}{:>10}",
            summary.store.to_string(),
            summary.product_count,
            summary.priced_count,
            fmt_price(summary.min_price),
            fmt_price(summary.max_price),
            fmt_price(summary.mean_price)
        );
    }
    Ok(())
}
