use shelfprice_core::{BrowserEngine, FetchFailure, FetchStage};
use thiserror::Error;

/// Why a page yielded no price.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no price element matched")]
    NotFound,

    #[error("price text could not be parsed: {text}")]
    Unparsable { text: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("bot challenge served by {url}")]
    Blocked { url: String },

    #[error("timed out while {stage}")]
    Timeout { stage: FetchStage },

    #[error("no page has been loaded in this session")]
    NoPage,

    #[error("failed to launch {engine} session: {reason}")]
    Launch {
        engine: BrowserEngine,
        reason: String,
    },

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("extraction task failed: {0}")]
    ExtractTask(#[from] tokio::task::JoinError),
}

impl FetchError {
    /// Returns `true` for conditions worth another navigation attempt:
    /// network failures other than timeouts, HTTP 429, and 5xx responses.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(e) => !e.is_timeout(),
            FetchError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Maps the error onto the reason reported in a `FetchResult`.
    #[must_use]
    pub fn to_failure(&self) -> FetchFailure {
        match self {
            FetchError::Http(e) if e.is_timeout() => FetchFailure::Timeout {
                stage: FetchStage::PageNavigating,
            },
            FetchError::Http(e) => FetchFailure::Network {
                message: e.to_string(),
            },
            FetchError::HttpStatus { status, .. } => FetchFailure::HttpStatus { status: *status },
            FetchError::Blocked { .. } => FetchFailure::Blocked,
            FetchError::Timeout { stage } => FetchFailure::Timeout { stage: *stage },
            FetchError::NoPage
            | FetchError::Extraction(ExtractError::NotFound)
            | FetchError::ExtractTask(_) => FetchFailure::ElementNotFound,
            FetchError::Extraction(ExtractError::Unparsable { text }) => {
                FetchFailure::Parse { text: text.clone() }
            }
            FetchError::Launch { reason, .. } => FetchFailure::BrowserLaunch {
                message: reason.clone(),
            },
        }
    }
}
