use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use shelfprice_catalog::{PriceFilter, SortOrder};
use shelfprice_core::Store;

/// Filter flags shared by `list`, `summary`, and `refresh`.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct FilterArgs {
    /// Limit to a store (coles, iga, woolworths); repeat for several
    #[arg(long, value_name = "STORE")]
    pub(crate) store: Vec<Store>,
    /// Minimum price, inclusive
    #[arg(long, value_name = "PRICE")]
    pub(crate) min: Option<Decimal>,
    /// Maximum price, inclusive
    #[arg(long, value_name = "PRICE")]
    pub(crate) max: Option<Decimal>,
    /// Case-insensitive product name substring
    #[arg(long, value_name = "TEXT")]
    pub(crate) search: Option<String>,
    /// Hide products without a price
    #[arg(long)]
    pub(crate) priced_only: bool,
}

impl FilterArgs {
    /// A single bound leaves the other side open.
    pub(crate) fn to_filter(&self) -> PriceFilter {
        let mut filter = PriceFilter::all().with_stores(self.store.iter().copied());
        if self.min.is_some() || self.max.is_some() {
            filter = filter.with_price_range(
                self.min.unwrap_or(Decimal::ZERO),
                self.max.unwrap_or(Decimal::MAX),
            );
        }
        if let Some(search) = &self.search {
            filter = filter.with_name_contains(search.clone());
        }
        if self.priced_only {
            filter = filter.priced_only();
        }
        filter
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortArg {
    PriceAsc,
    PriceDesc,
    Name,
    Store,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::PriceAsc => SortOrder::PriceAsc,
            SortArg::PriceDesc => SortOrder::PriceDesc,
            SortArg::Name => SortOrder::Name,
            SortArg::Store => SortOrder::Store,
        }
    }
}
