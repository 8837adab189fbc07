use shelfprice_core::{Store, StoreSource};

/// Column layout of one store's export.
///
/// Each field lists the header names it may appear under, in preference
/// order. Header matching is case-insensitive. Fields whose columns are all
/// missing come out absent.
#[derive(Debug, Clone)]
pub struct StoreSchema {
    pub name_columns: &'static [&'static str],
    pub brand_columns: &'static [&'static str],
    pub price_columns: &'static [&'static str],
    pub image_columns: &'static [&'static str],
    pub url_columns: &'static [&'static str],
    /// Brand applied when the export has no brand value.
    pub default_brand: Option<String>,
}

/// Coles exports use camel-cased `imageURL`/`productURL` and a bare `name`,
/// with the older snake-case headers as fallback. There is no brand column.
const COLES: StoreSchema = StoreSchema {
    name_columns: &["name", "product_name"],
    brand_columns: &[],
    price_columns: &["price"],
    image_columns: &["imageurl", "image_url"],
    url_columns: &["producturl", "product_url", "url"],
    default_brand: None,
};

const BRANDED: StoreSchema = StoreSchema {
    name_columns: &["product_name", "name"],
    brand_columns: &["brand"],
    price_columns: &["price"],
    image_columns: &["image_url", "imageurl", "image"],
    url_columns: &["product_url", "producturl", "url"],
    default_brand: None,
};

impl StoreSchema {
    /// Built-in layout for `store`'s export.
    #[must_use]
    pub fn for_store(store: Store) -> Self {
        match store {
            Store::Coles => COLES,
            Store::Iga | Store::Woolworths => BRANDED,
        }
    }

    /// Built-in layout with the configured default brand applied.
    #[must_use]
    pub fn for_source(source: &StoreSource) -> Self {
        Self::for_store(source.store).with_default_brand(source.default_brand.clone())
    }

    #[must_use]
    pub fn with_default_brand(mut self, brand: Option<String>) -> Self {
        self.default_brand = brand.filter(|b| !b.trim().is_empty());
        self
    }
}
