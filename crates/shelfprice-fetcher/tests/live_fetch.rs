//! Integration tests for `LiveFetcher` on the HTTP page backend.
//!
//! Each test stands up a `wiremock` server serving product pages, so no real
//! network traffic is made. Warm-up visits are pointed at the mock server or
//! disabled.

use std::time::Duration;

use rust_decimal::Decimal;
use wiremock::matchers::{header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfprice_core::{BrowserEngine, FetchFailure, FetchStage, ProductRecord, RecordId, Store};
use shelfprice_fetcher::{FetchSettings, HttpBrowser, LiveFetcher, StoreFetchConfig};

const WOOLWORTHS_PAGE: &str = r#"<html><body>
  <div class="product-price_component_price-container__UYB1q">
    <div class="product-price_component_price-lead__vlm8f">$2.40</div>
    <div class="product-price_component_price-was__1y1bH">Was $4.50</div>
  </div>
</body></html>"#;

const COLES_PAGE: &str = r#"<html><body>
  <span data-testid="product-price">$4.50</span>
</body></html>"#;

const CHALLENGE_PAGE: &str = r#"<html><head><title>Just a moment...</title></head>
<body><script src="/cdn-cgi/challenge-platform/h/b/orchestrate/jsch/v1"></script></body></html>"#;

fn settings(max_retries: u32) -> FetchSettings {
    FetchSettings {
        nav_timeout: Duration::from_secs(5),
        extract_timeout: Duration::from_secs(5),
        max_retries,
        backoff_base_secs: 0,
        concurrency: 1,
    }
}

fn test_fetcher(max_retries: u32) -> LiveFetcher<HttpBrowser> {
    let browser = HttpBrowser::new(Duration::from_secs(5), None);
    let mut fetcher = LiveFetcher::new(browser, settings(max_retries));
    for store in Store::ALL {
        fetcher = fetcher.with_store_config(
            store,
            StoreFetchConfig {
                engine: store.default_engine(),
                warmup_url: None,
            },
        );
    }
    fetcher
}

fn record(store: Store, url: String) -> ProductRecord {
    ProductRecord::new(RecordId::new(store, 0), "Coca-Cola Classic 1.25L").with_source_url(Some(url))
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetches_woolworths_price_with_firefox_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/shop/productdetails/94798"))
        .and(header_regex("accept-language", "^en-AU"))
        .and(header_regex("user-agent", "Firefox/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WOOLWORTHS_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/shop/productdetails/94798", server.uri());
    let result = test_fetcher(0)
        .fetch_price(&record(Store::Woolworths, url.clone()))
        .await;

    assert!(result.is_success(), "expected success, got: {result:?}");
    assert_eq!(result.price(), Some(Decimal::new(240, 2)));
    assert_eq!(result.source_url.as_deref(), Some(url.as_str()));
}

#[tokio::test]
async fn coles_warmup_cookie_is_sent_with_product_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "visitorId=abc123; Path=/")
                .set_body_string("<html>home</html>"),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/product/coca-cola-1-25l-123"))
        .and(header("cookie", "visitorId=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_string(COLES_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = test_fetcher(0).with_store_config(
        Store::Coles,
        StoreFetchConfig {
            engine: BrowserEngine::Chromium,
            warmup_url: Some(format!("{}/", server.uri())),
        },
    );
    let url = format!("{}/product/coca-cola-1-25l-123", server.uri());
    let result = fetcher.fetch_price(&record(Store::Coles, url)).await;

    assert_eq!(result.price(), Some(Decimal::new(450, 2)));
}

// ---------------------------------------------------------------------------
// Failure reporting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn challenge_page_is_reported_as_blocked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CHALLENGE_PAGE))
        .mount(&server)
        .await;

    let url = format!("{}/product/1", server.uri());
    let result = test_fetcher(2).fetch_price(&record(Store::Coles, url)).await;

    assert_eq!(result.error(), Some(&FetchFailure::Blocked));
}

#[tokio::test]
async fn not_found_is_reported_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/sm/product/missing", server.uri());
    let result = test_fetcher(3).fetch_price(&record(Store::Iga, url)).await;

    assert_eq!(result.error(), Some(&FetchFailure::HttpStatus { status: 404 }));
}

#[tokio::test]
async fn server_errors_are_retried_then_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let url = format!("{}/sm/product/1", server.uri());
    let result = test_fetcher(2).fetch_price(&record(Store::Iga, url)).await;

    assert_eq!(result.error(), Some(&FetchFailure::HttpStatus { status: 503 }));
}

#[tokio::test]
async fn slow_page_times_out_during_navigation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(WOOLWORTHS_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let browser = HttpBrowser::new(Duration::from_secs(10), None);
    let fetcher = LiveFetcher::new(
        browser,
        FetchSettings {
            nav_timeout: Duration::from_millis(300),
            ..settings(0)
        },
    );
    let url = format!("{}/shop/productdetails/1", server.uri());
    let result = fetcher.fetch_price(&record(Store::Woolworths, url)).await;

    assert_eq!(
        result.error(),
        Some(&FetchFailure::Timeout {
            stage: FetchStage::PageNavigating
        })
    );
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let result = test_fetcher(0)
        .fetch_price(&record(Store::Iga, "http://127.0.0.1:1/product".to_owned()))
        .await;

    assert!(
        matches!(result.error(), Some(FetchFailure::Network { .. })),
        "expected network error, got: {result:?}"
    );
}

// ---------------------------------------------------------------------------
// Bulk
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bulk_fetch_reports_every_record() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(WOOLWORTHS_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let fetcher = test_fetcher(0);
    let ok = record(Store::Woolworths, format!("{}/ok", server.uri()));
    let empty = ProductRecord::new(RecordId::new(Store::Woolworths, 1), "Sprite 2L")
        .with_source_url(Some(format!("{}/empty", server.uri())));

    let results = fetcher.fetch_all(&[&ok, &empty]).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].price(), Some(Decimal::new(240, 2)));
    assert_eq!(results[1].error(), Some(&FetchFailure::ElementNotFound));
}
