//! Shared domain types, price parsing, and configuration for shelfprice.

pub mod app_config;
pub mod config;
pub mod error;
pub mod price;
pub mod products;
pub mod store;
pub mod stores;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use price::{parse_image_url, parse_price, parse_price_text};
pub use products::{FetchFailure, FetchResult, FetchStage, ProductRecord};
pub use store::{BrowserEngine, RecordId, Store};
pub use stores::{load_stores, StoreSource, StoresFile};
