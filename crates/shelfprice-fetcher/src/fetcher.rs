use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use shelfprice_core::{
    AppConfig, BrowserEngine, FetchFailure, FetchResult, FetchStage, ProductRecord, Store,
    StoreSource,
};

use crate::error::FetchError;
use crate::extract::extractor_for;
use crate::rate_limit::retry_with_backoff;
use crate::session::{BrowserLauncher, HttpBrowser, PageSession};

/// Timeouts, retry policy, and bulk concurrency for a [`LiveFetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub nav_timeout: Duration,
    pub extract_timeout: Duration,
    /// Extra navigation attempts after a transient failure.
    pub max_retries: u32,
    pub backoff_base_secs: u64,
    /// Fetches in flight during [`LiveFetcher::fetch_all`]. `1` is sequential.
    pub concurrency: usize,
}

impl FetchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            nav_timeout: Duration::from_secs(config.nav_timeout_secs),
            extract_timeout: Duration::from_secs(config.extract_timeout_secs),
            max_retries: config.fetch_max_retries,
            backoff_base_secs: config.fetch_backoff_base_secs,
            concurrency: config.fetch_concurrency,
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// How pages for one store are opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreFetchConfig {
    pub engine: BrowserEngine,
    /// Visited before the product page. Failures here are logged and
    /// ignored.
    pub warmup_url: Option<String>,
}

impl StoreFetchConfig {
    #[must_use]
    pub fn default_for(store: Store) -> Self {
        Self {
            engine: store.default_engine(),
            warmup_url: extractor_for(store).warmup_url().map(str::to_owned),
        }
    }

    #[must_use]
    pub fn from_source(source: &StoreSource) -> Self {
        let defaults = Self::default_for(source.store);
        Self {
            engine: source.engine(),
            warmup_url: source.warmup_url.clone().or(defaults.warmup_url),
        }
    }
}

/// Fetches current prices from product pages, one fresh session per
/// product.
pub struct LiveFetcher<B: BrowserLauncher> {
    launcher: B,
    settings: FetchSettings,
    stores: HashMap<Store, StoreFetchConfig>,
}

impl LiveFetcher<HttpBrowser> {
    /// Builds a fetcher on the HTTP page backend from the application
    /// config and the per-store settings in `stores.yaml`.
    #[must_use]
    pub fn from_config(config: &AppConfig, sources: &[StoreSource]) -> Self {
        let settings = FetchSettings::from_config(config);
        let browser = HttpBrowser::new(settings.nav_timeout, config.user_agent.clone());
        Self::new(browser, settings).with_sources(sources)
    }
}

impl<B: BrowserLauncher> LiveFetcher<B> {
    #[must_use]
    pub fn new(launcher: B, settings: FetchSettings) -> Self {
        let stores = Store::ALL
            .into_iter()
            .map(|store| (store, StoreFetchConfig::default_for(store)))
            .collect();
        Self {
            launcher,
            settings,
            stores,
        }
    }

    #[must_use]
    pub fn with_sources(mut self, sources: &[StoreSource]) -> Self {
        for source in sources {
            self.stores
                .insert(source.store, StoreFetchConfig::from_source(source));
        }
        self
    }

    #[must_use]
    pub fn with_store_config(mut self, store: Store, config: StoreFetchConfig) -> Self {
        self.stores.insert(store, config);
        self
    }

    #[must_use]
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetches the live price for one record.
    ///
    /// Never fails: every problem is reported through the returned
    /// [`FetchResult`]. A record without a product URL yields
    /// [`FetchFailure::MissingUrl`] and no session is opened.
    pub async fn fetch_price(&self, record: &ProductRecord) -> FetchResult {
        let store = record.store;
        let Some(url) = record.source_url.as_deref() else {
            tracing::warn!(id = %record.id, %store, "record has no product URL");
            return FetchResult::failure(record, FetchFailure::MissingUrl);
        };

        match self.run(store, url).await {
            Ok(price) => {
                trace_stage(store, url, FetchStage::Success);
                tracing::info!(id = %record.id, %store, %price, "live price fetched");
                FetchResult::success(record, price)
            }
            Err(e) => {
                trace_stage(store, url, FetchStage::Failed);
                tracing::warn!(id = %record.id, %store, url, error = %e, "live fetch failed");
                FetchResult::failure(record, e.to_failure())
            }
        }
    }

    /// Fetches every record with up to `concurrency` fetches in flight.
    /// Results come back in input order, one per record.
    pub async fn fetch_all(&self, records: &[&ProductRecord]) -> Vec<FetchResult> {
        let total = records.len();
        let results: Vec<FetchResult> =
            stream::iter(records.iter().map(|record| self.fetch_price(record)))
                .buffered(self.settings.concurrency.max(1))
                .collect()
                .await;

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        tracing::info!(total, succeeded, failed = total - succeeded, "bulk fetch finished");
        results
    }

    fn config_for(&self, store: Store) -> StoreFetchConfig {
        self.stores
            .get(&store)
            .cloned()
            .unwrap_or_else(|| StoreFetchConfig::default_for(store))
    }

    async fn run(&self, store: Store, url: &str) -> Result<Decimal, FetchError> {
        let config = self.config_for(store);

        trace_stage(store, url, FetchStage::BrowserLaunching);
        let session = timed(
            FetchStage::BrowserLaunching,
            self.settings.nav_timeout,
            self.launcher.launch(config.engine),
        )
        .await?;

        let outcome = self.drive(&session, store, &config, url).await;
        session.close().await;
        outcome
    }

    async fn drive(
        &self,
        session: &B::Session,
        store: Store,
        config: &StoreFetchConfig,
        url: &str,
    ) -> Result<Decimal, FetchError> {
        let nav_timeout = self.settings.nav_timeout;

        if let Some(warmup) = config.warmup_url.as_deref() {
            match timed(FetchStage::PageNavigating, nav_timeout, session.goto(warmup)).await {
                Ok(()) => tracing::debug!(%store, warmup, "warm-up page loaded"),
                Err(e) => {
                    tracing::warn!(%store, warmup, error = %e, "warm-up navigation failed, continuing");
                }
            }
        }

        trace_stage(store, url, FetchStage::PageNavigating);
        retry_with_backoff(
            self.settings.max_retries,
            self.settings.backoff_base_secs,
            move || timed(FetchStage::PageNavigating, nav_timeout, session.goto(url)),
        )
        .await?;

        trace_stage(store, url, FetchStage::PriceExtracting);
        timed(
            FetchStage::PriceExtracting,
            self.settings.extract_timeout,
            async {
                let html = session.content().await?;
                // Parsing a large page is CPU-bound. On timeout the blocking
                // task is detached and its result discarded.
                let price =
                    tokio::task::spawn_blocking(move || extractor_for(store).extract(&html))
                        .await??;
                Ok::<_, FetchError>(price)
            },
        )
        .await
    }
}

async fn timed<T>(
    stage: FetchStage,
    limit: Duration,
    operation: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    tokio::time::timeout(limit, operation)
        .await
        .map_err(|_| FetchError::Timeout { stage })?
}

fn trace_stage(store: Store, url: &str, stage: FetchStage) {
    tracing::debug!(%store, url, %stage, "fetch stage");
}

#[cfg(test)]
#[path = "fetcher_test.rs"]
mod tests;
