use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{BrowserEngine, ConfigError, Store};

/// One store's tabular source and live-fetch settings, as declared in
/// `config/stores.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSource {
    pub store: Store,
    pub csv_path: PathBuf,
    /// Brand used when the export has no brand column (Coles).
    pub default_brand: Option<String>,
    /// Overrides [`Store::default_engine`].
    pub engine: Option<BrowserEngine>,
    /// Page visited before the product page to pick up session cookies.
    pub warmup_url: Option<String>,
}

impl StoreSource {
    #[must_use]
    pub fn engine(&self) -> BrowserEngine {
        self.engine.unwrap_or_else(|| self.store.default_engine())
    }
}

#[derive(Debug, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<StoreSource>,
}

impl StoresFile {
    #[must_use]
    pub fn source_for(&self, store: Store) -> Option<&StoreSource> {
        self.stores.iter().find(|s| s.store == store)
    }
}

/// Load and validate the stores configuration from a YAML file.
///
/// Relative `csv_path` entries are resolved against the directory holding the
/// YAML file's parent (the project root for `config/stores.yaml`) when they do
/// not exist relative to the working directory.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut stores_file = parse_stores(&content)?;

    if let Some(root) = path.parent().and_then(Path::parent) {
        for source in &mut stores_file.stores {
            if source.csv_path.is_relative() && !source.csv_path.exists() {
                let candidate = root.join(&source.csv_path);
                if candidate.exists() {
                    source.csv_path = candidate;
                }
            }
        }
    }

    Ok(stores_file)
}

fn parse_stores(content: &str) -> Result<StoresFile, ConfigError> {
    let stores_file: StoresFile = serde_yaml::from_str(content)?;
    validate_stores(&stores_file)?;
    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    if stores_file.stores.is_empty() {
        return Err(ConfigError::Validation(
            "at least one store must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for source in &stores_file.stores {
        if source.csv_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(format!(
                "store '{}' has an empty csv_path",
                source.store
            )));
        }

        if !seen.insert(source.store) {
            return Err(ConfigError::Validation(format!(
                "duplicate store entry: '{}'",
                source.store
            )));
        }

        if let Some(url) = &source.warmup_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "store '{}' has a non-HTTP warmup_url: {url}",
                    source.store
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r"
stores:
  - store: coles
    csv_path: data/coles_coca_cola_products.csv
    default_brand: Coca-Cola
    warmup_url: https://www.coles.com.au
  - store: iga
    csv_path: data/iga_coca_cola_products.csv
  - store: woolworths
    csv_path: data/woolworths_coca_cola_products.csv
    engine: chromium
";

    #[test]
    fn parses_valid_stores_file() {
        let file = parse_stores(VALID).unwrap();
        assert_eq!(file.stores.len(), 3);

        let coles = file.source_for(Store::Coles).unwrap();
        assert_eq!(coles.default_brand.as_deref(), Some("Coca-Cola"));
        assert_eq!(coles.engine(), BrowserEngine::Chromium);
        assert_eq!(coles.warmup_url.as_deref(), Some("https://www.coles.com.au"));
    }

    #[test]
    fn engine_defaults_from_store_and_can_be_overridden() {
        let file = parse_stores(VALID).unwrap();
        assert_eq!(
            file.source_for(Store::Iga).unwrap().engine(),
            BrowserEngine::Firefox
        );
        assert_eq!(
            file.source_for(Store::Woolworths).unwrap().engine(),
            BrowserEngine::Chromium
        );
    }

    #[test]
    fn rejects_duplicate_store() {
        let yaml = r"
stores:
  - store: iga
    csv_path: a.csv
  - store: iga
    csv_path: b.csv
";
        let err = parse_stores(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn rejects_empty_store_list() {
        let err = parse_stores("stores: []").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn rejects_unknown_store_name() {
        let yaml = r"
stores:
  - store: aldi
    csv_path: aldi.csv
";
        assert!(matches!(
            parse_stores(yaml),
            Err(ConfigError::StoresFileParse(_))
        ));
    }

    #[test]
    fn rejects_non_http_warmup_url() {
        let yaml = r"
stores:
  - store: coles
    csv_path: coles.csv
    warmup_url: ftp://coles.com.au
";
        let err = parse_stores(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("warmup_url")));
    }

    #[test]
    fn load_stores_reports_missing_file() {
        let err = load_stores(Path::new("/nonexistent/stores.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::StoresFileIo { .. }));
    }
}
