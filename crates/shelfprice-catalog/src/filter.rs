use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shelfprice_core::{ProductRecord, Store};

/// Query filter over a [`crate::Catalog`].
///
/// An empty `stores` list means every store. When `price_range` is set,
/// records without a price never match; otherwise `include_unpriced`
/// decides whether they appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFilter {
    pub stores: Vec<Store>,
    /// Inclusive `(min, max)`.
    pub price_range: Option<(Decimal, Decimal)>,
    pub name_contains: Option<String>,
    pub include_unpriced: bool,
}

impl Default for PriceFilter {
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            price_range: None,
            name_contains: None,
            include_unpriced: true,
        }
    }
}

impl PriceFilter {
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_stores(mut self, stores: impl IntoIterator<Item = Store>) -> Self {
        self.stores = stores.into_iter().collect();
        self
    }

    /// Sets an inclusive price range. Bounds given in the wrong order are
    /// swapped.
    #[must_use]
    pub fn with_price_range(mut self, min: Decimal, max: Decimal) -> Self {
        self.price_range = Some(if min <= max { (min, max) } else { (max, min) });
        self
    }

    #[must_use]
    pub fn with_name_contains(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.name_contains = (!needle.trim().is_empty()).then_some(needle);
        self
    }

    #[must_use]
    pub fn priced_only(mut self) -> Self {
        self.include_unpriced = false;
        self
    }

    #[must_use]
    pub fn includes_store(&self, store: Store) -> bool {
        self.stores.is_empty() || self.stores.contains(&store)
    }

    #[must_use]
    pub fn matches(&self, record: &ProductRecord) -> bool {
        if !self.includes_store(record.store) {
            return false;
        }

        match (record.price(), self.price_range) {
            (Some(price), Some((min, max))) => {
                if price < min || price > max {
                    return false;
                }
            }
            (None, Some(_)) => return false,
            (None, None) if !self.include_unpriced => return false,
            _ => {}
        }

        if let Some(needle) = &self.name_contains {
            let needle = needle.trim().to_lowercase();
            if !record.name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }
}

/// Caller-selected ordering for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    PriceAsc,
    PriceDesc,
    Name,
    Store,
}

/// Sorts `records` in place. The sort is stable, and records without a price
/// go last in both price orders.
pub fn sort_records(records: &mut [&ProductRecord], order: SortOrder) {
    match order {
        SortOrder::PriceAsc => records.sort_by(|a, b| cmp_price(a.price(), b.price(), false)),
        SortOrder::PriceDesc => records.sort_by(|a, b| cmp_price(a.price(), b.price(), true)),
        SortOrder::Name => records.sort_by_key(|r| r.name.to_lowercase()),
        SortOrder::Store => records.sort_by_key(|r| r.store),
    }
}

fn cmp_price(a: Option<Decimal>, b: Option<Decimal>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use shelfprice_core::RecordId;

    use super::*;

    fn rec(store: Store, row: usize, name: &str, price: Option<i64>) -> ProductRecord {
        ProductRecord::new(RecordId::new(store, row), name).with_price(price.map(|p| Decimal::new(p, 2)))
    }

    #[test]
    fn default_filter_matches_everything() {
        let filter = PriceFilter::all();
        assert!(filter.matches(&rec(Store::Coles, 0, "Coke", Some(450))));
        assert!(filter.matches(&rec(Store::Iga, 0, "Sprite", None)));
    }

    #[test]
    fn price_range_is_inclusive() {
        let filter = PriceFilter::all().with_price_range(Decimal::new(5, 0), Decimal::new(10, 0));
        assert!(filter.matches(&rec(Store::Coles, 0, "a", Some(500))));
        assert!(filter.matches(&rec(Store::Coles, 1, "b", Some(1000))));
        assert!(!filter.matches(&rec(Store::Coles, 2, "c", Some(499))));
        assert!(!filter.matches(&rec(Store::Coles, 3, "d", Some(1001))));
    }

    #[test]
    fn price_range_excludes_unpriced_records() {
        let filter = PriceFilter::all().with_price_range(Decimal::ZERO, Decimal::new(1000, 0));
        assert!(!filter.matches(&rec(Store::Iga, 0, "Sprite", None)));
    }

    #[test]
    fn reversed_range_is_swapped() {
        let filter = PriceFilter::all().with_price_range(Decimal::new(10, 0), Decimal::new(5, 0));
        assert_eq!(filter.price_range, Some((Decimal::new(5, 0), Decimal::new(10, 0))));
    }

    #[test]
    fn priced_only_drops_unpriced_records() {
        let filter = PriceFilter::all().priced_only();
        assert!(!filter.matches(&rec(Store::Iga, 0, "Sprite", None)));
        assert!(filter.matches(&rec(Store::Iga, 1, "Fanta", Some(295))));
    }

    #[test]
    fn store_filter_limits_membership() {
        let filter = PriceFilter::all().with_stores([Store::Iga, Store::Woolworths]);
        assert!(!filter.matches(&rec(Store::Coles, 0, "Coke", Some(450))));
        assert!(filter.matches(&rec(Store::Woolworths, 0, "Coke", Some(450))));
    }

    #[test]
    fn name_match_is_case_insensitive_substring() {
        let filter = PriceFilter::all().with_name_contains("ZERO");
        assert!(filter.matches(&rec(Store::Coles, 0, "Coke Zero 2L", Some(400))));
        assert!(!filter.matches(&rec(Store::Coles, 1, "Diet Coke 2L", Some(400))));
    }

    #[test]
    fn blank_search_is_ignored() {
        let filter = PriceFilter::all().with_name_contains("  ");
        assert!(filter.name_contains.is_none());
    }

    #[test]
    fn price_sorts_put_unpriced_last() {
        let a = rec(Store::Coles, 0, "a", Some(300));
        let b = rec(Store::Coles, 1, "b", None);
        let c = rec(Store::Coles, 2, "c", Some(100));

        let mut asc = vec![&a, &b, &c];
        sort_records(&mut asc, SortOrder::PriceAsc);
        assert_eq!(asc.iter().map(|r| r.id.row).collect::<Vec<_>>(), [2, 0, 1]);

        let mut desc = vec![&a, &b, &c];
        sort_records(&mut desc, SortOrder::PriceDesc);
        assert_eq!(desc.iter().map(|r| r.id.row).collect::<Vec<_>>(), [0, 2, 1]);
    }

    #[test]
    fn store_sort_is_stable() {
        let a = rec(Store::Woolworths, 0, "a", None);
        let b = rec(Store::Coles, 0, "b", None);
        let c = rec(Store::Woolworths, 1, "c", None);
        let d = rec(Store::Coles, 1, "d", None);

        let mut records = vec![&a, &b, &c, &d];
        sort_records(&mut records, SortOrder::Store);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["b", "d", "a", "c"]);
    }

    #[test]
    fn name_sort_ignores_case() {
        let a = rec(Store::Coles, 0, "sprite", None);
        let b = rec(Store::Coles, 1, "Coke", None);
        let mut records = vec![&a, &b];
        sort_records(&mut records, SortOrder::Name);
        assert_eq!(records[0].name, "Coke");
    }
}
