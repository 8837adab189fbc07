//! Request profiles that make a page session look like a desktop browser of
//! the chosen engine, browsing from Australia.

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL,
    UPGRADE_INSECURE_REQUESTS,
};
use shelfprice_core::BrowserEngine;

const CHROMIUM_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FIREFOX_UA: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

/// Navigation headers a browser sends for a top-level document load.
const SEC_FETCH: [(&str, &str); 3] = [
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "none"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineProfile {
    pub engine: BrowserEngine,
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub cache_control: &'static str,
}

impl EngineProfile {
    #[must_use]
    pub fn for_engine(engine: BrowserEngine) -> Self {
        match engine {
            BrowserEngine::Chromium => Self {
                engine,
                user_agent: CHROMIUM_UA,
                accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,image/apng,*/*;q=0.8",
                accept_language: "en-AU,en-US;q=0.9,en;q=0.8",
                cache_control: "no-cache",
            },
            BrowserEngine::Firefox => Self {
                engine,
                user_agent: FIREFOX_UA,
                accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
                accept_language: "en-AU,en-US;q=0.8,en;q=0.6",
                cache_control: "max-age=0",
            },
        }
    }

    /// Default headers for every request in a session using this profile.
    /// The user agent is set separately on the client.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(self.accept_language));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(self.cache_control));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        for (name, value) in SEC_FETCH {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        headers
    }
}
