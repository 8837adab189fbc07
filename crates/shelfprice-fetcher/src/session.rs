//! Page sessions: the seam between the fetch state machine and whatever
//! actually loads pages.
//!
//! [`HttpBrowser`] is the shipped backend. It loads a page with a plain
//! document request using the engine's [`EngineProfile`] and a cookie jar
//! private to the session. A scripted-browser backend plugs in by
//! implementing [`BrowserLauncher`] and [`PageSession`].

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use shelfprice_core::BrowserEngine;
use tokio::sync::Mutex;

use crate::error::FetchError;
use crate::profile::EngineProfile;

/// One exclusively-owned browsing context.
pub trait PageSession: Send + Sync {
    /// Navigates to `url` and waits until the document has loaded.
    fn goto(&self, url: &str) -> impl Future<Output = Result<(), FetchError>> + Send;

    /// Source of the currently loaded document.
    fn content(&self) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Releases the session. Dropping a session without closing it must
    /// also release its resources.
    fn close(self) -> impl Future<Output = ()> + Send
    where
        Self: Sized;
}

/// Opens fresh sessions for an engine.
pub trait BrowserLauncher: Send + Sync {
    type Session: PageSession;

    fn launch(
        &self,
        engine: BrowserEngine,
    ) -> impl Future<Output = Result<Self::Session, FetchError>> + Send;
}

/// Launches [`HttpPageSession`]s.
#[derive(Debug, Clone)]
pub struct HttpBrowser {
    request_timeout: Duration,
    user_agent: Option<String>,
}

impl HttpBrowser {
    /// `request_timeout` bounds each request at the transport level; the
    /// fetcher applies its own stage timeouts on top. `user_agent` replaces
    /// the engine profile's default when set.
    #[must_use]
    pub fn new(request_timeout: Duration, user_agent: Option<String>) -> Self {
        Self {
            request_timeout,
            user_agent,
        }
    }
}

impl BrowserLauncher for HttpBrowser {
    type Session = HttpPageSession;

    async fn launch(&self, engine: BrowserEngine) -> Result<HttpPageSession, FetchError> {
        let profile = EngineProfile::for_engine(engine);
        let user_agent = self.user_agent.as_deref().unwrap_or(profile.user_agent);
        let client = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(profile.headers())
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| FetchError::Launch {
                engine,
                reason: e.to_string(),
            })?;

        tracing::debug!(%engine, "page session opened");
        Ok(HttpPageSession {
            engine,
            client,
            document: Mutex::new(None),
        })
    }
}

/// Session backed by a `reqwest::Client` with its own cookie store.
#[derive(Debug)]
pub struct HttpPageSession {
    engine: BrowserEngine,
    client: Client,
    document: Mutex<Option<String>>,
}

impl PageSession for HttpPageSession {
    async fn goto(&self, url: &str) -> Result<(), FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let body = response.text().await?;
        if looks_like_bot_challenge(&body) {
            return Err(FetchError::Blocked {
                url: url.to_owned(),
            });
        }

        *self.document.lock().await = Some(body);
        Ok(())
    }

    async fn content(&self) -> Result<String, FetchError> {
        self.document.lock().await.clone().ok_or(FetchError::NoPage)
    }

    async fn close(self) {
        tracing::debug!(engine = %self.engine, "page session closed");
    }
}

/// Detects interstitial challenge pages served instead of the product page.
pub(crate) fn looks_like_bot_challenge(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    let has_cloudflare_banner = lowered.contains("attention required! | cloudflare");
    let has_challenge_platform = lowered.contains("/cdn-cgi/challenge-platform/");
    let has_just_a_moment = lowered.contains("just a moment...");
    let has_cookie_gate = lowered.contains("please enable cookies");
    let has_cf_chl = lowered.contains("cf-chl-");
    let has_incapsula = lowered.contains("incapsula incident id");

    has_cloudflare_banner
        || has_challenge_platform
        || has_incapsula
        || (has_just_a_moment && has_cookie_gate)
        || (has_just_a_moment && has_cf_chl)
}
