use rust_decimal::Decimal;
use serde::Serialize;
use shelfprice_core::{ProductRecord, Store};

/// Per-store price statistics over a filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSummary {
    pub store: Store,
    /// `false` when the store's source failed to load.
    pub available: bool,
    pub product_count: usize,
    pub priced_count: usize,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Mean of the available prices, rounded to cents.
    pub mean_price: Option<Decimal>,
}

impl StoreSummary {
    pub(crate) fn from_records<'a>(
        store: Store,
        available: bool,
        records: impl IntoIterator<Item = &'a ProductRecord>,
    ) -> Self {
        let mut product_count = 0usize;
        let mut prices = Vec::new();
        for record in records {
            product_count += 1;
            if let Some(price) = record.price() {
                prices.push(price);
            }
        }

        let min_price = prices.iter().min().copied();
        let max_price = prices.iter().max().copied();
        let mean_price = mean_to_cents(&prices);
        if mean_price.is_none() && !prices.is_empty() {
            tracing::warn!(%store, priced = prices.len(), "price total overflowed, mean omitted");
        }

        Self {
            store,
            available,
            product_count,
            priced_count: prices.len(),
            min_price,
            max_price,
            mean_price,
        }
    }
}

/// `None` for no prices, or when the total does not fit in a `Decimal`.
fn mean_to_cents(prices: &[Decimal]) -> Option<Decimal> {
    if prices.is_empty() {
        return None;
    }
    let total = prices
        .iter()
        .try_fold(Decimal::ZERO, |acc, price| acc.checked_add(*price))?;
    total
        .checked_div(Decimal::from(prices.len()))
        .map(|mean| mean.round_dp(2))
}

#[cfg(test)]
mod tests {
    use shelfprice_core::RecordId;

    use super::*;

    fn rec(row: usize, price: Option<i64>) -> ProductRecord {
        ProductRecord::new(RecordId::new(Store::Iga, row), format!("item {row}"))
            .with_price(price.map(|p| Decimal::new(p, 2)))
    }

    #[test]
    fn summarizes_priced_and_unpriced_records() {
        let records = [rec(0, Some(250)), rec(1, None), rec(2, Some(400)), rec(3, Some(300))];
        let summary = StoreSummary::from_records(Store::Iga, true, &records);

        assert_eq!(summary.product_count, 4);
        assert_eq!(summary.priced_count, 3);
        assert_eq!(summary.min_price, Some(Decimal::new(250, 2)));
        assert_eq!(summary.max_price, Some(Decimal::new(400, 2)));
        assert_eq!(summary.mean_price, Some(Decimal::new(317, 2)));
    }

    #[test]
    fn empty_store_has_no_prices() {
        let summary = StoreSummary::from_records(Store::Coles, false, &[]);
        assert_eq!(summary.product_count, 0);
        assert!(!summary.available);
        assert!(summary.mean_price.is_none());
        assert!(summary.min_price.is_none());
    }

    #[test]
    fn overflowing_total_omits_mean_but_keeps_bounds() {
        let records = [
            rec(0, None).with_price(Some(Decimal::MAX)),
            rec(1, None).with_price(Some(Decimal::MAX)),
            rec(2, Some(250)),
        ];
        let summary = StoreSummary::from_records(Store::Iga, true, &records);

        assert_eq!(summary.priced_count, 3);
        assert_eq!(summary.min_price, Some(Decimal::new(250, 2)));
        assert_eq!(summary.max_price, Some(Decimal::MAX));
        assert!(summary.mean_price.is_none());
    }
}
