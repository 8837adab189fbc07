use rust_decimal::Decimal;
use serde::Serialize;
use shelfprice_core::{FetchResult, ProductRecord, Store};

const NAME_WIDTH: usize = 60;

/// JSON shape of a record, with the derived availability flags spelled out.
#[derive(Debug, Serialize)]
pub(crate) struct RecordView<'a> {
    pub(crate) id: String,
    pub(crate) store: Store,
    pub(crate) name: &'a str,
    pub(crate) brand: Option<&'a str>,
    pub(crate) price: Option<Decimal>,
    pub(crate) price_available: bool,
    pub(crate) image_url: Option<&'a str>,
    pub(crate) image_available: bool,
    pub(crate) source_url: Option<&'a str>,
}

impl<'a> From<&'a ProductRecord> for RecordView<'a> {
    fn from(record: &'a ProductRecord) -> Self {
        Self {
            id: record.id.to_string(),
            store: record.store,
            name: &record.name,
            brand: record.brand.as_deref(),
            price: record.price(),
            price_available: record.price_available(),
            image_url: record.image_url(),
            image_available: record.image_available(),
            source_url: record.source_url.as_deref(),
        }
    }
}

/// `$4.50`, or an em dash when there is no price.
pub(crate) fn fmt_price(price: Option<Decimal>) -> String {
    price.map_or_else(|| "\u{2014}".to_string(), |p| format!("${p:.2}"))
}

pub(crate) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_owned()
    }
}

pub(crate) fn print_record_table(records: &[&ProductRecord]) {
    println!("{:<16}{:<12}{:>10}  NAME", "ID", "STORE", "PRICE");
    for record in records {
        println!(
            "{:<16}{:<12}{:>10}  {}",
            record.id.to_string(),
            record.store.to_string(),
            fmt_price(record.price()),
            truncate(&record.name, NAME_WIDTH)
        );
    }
}

/// One line per fetch: the new price or the failure reason.
pub(crate) fn print_fetch_line(result: &FetchResult) {
    match (result.price(), result.error()) {
        (Some(price), _) => println!("{:<16}ok      {}", result.id.to_string(), fmt_price(Some(price))),
        (None, Some(error)) => println!("{:<16}failed  {error}", result.id.to_string()),
        (None, None) => println!("{:<16}failed", result.id.to_string()),
    }
}
