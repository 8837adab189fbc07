use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub stores_path: PathBuf,
    /// Bounded wait for one page navigation, including the warm-up visit.
    pub nav_timeout_secs: u64,
    /// Bounded wait for reading the rendered page and applying the
    /// extraction rule.
    pub extract_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_secs: u64,
    /// Maximum live fetches in flight during a bulk refresh. Always >= 1.
    pub fetch_concurrency: usize,
    /// Overrides the engine profile's user agent when set.
    pub user_agent: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stores_path: PathBuf::from("./config/stores.yaml"),
            nav_timeout_secs: 20,
            extract_timeout_secs: 10,
            fetch_max_retries: 2,
            fetch_backoff_base_secs: 1,
            fetch_concurrency: 1,
            user_agent: None,
        }
    }
}
