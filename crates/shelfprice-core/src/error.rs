use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown store: {0}")]
    UnknownStore(String),

    #[error("unknown browser engine: {0}")]
    UnknownEngine(String),

    #[error("invalid record id \"{id}\": {reason}")]
    InvalidRecordId { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read stores file {path}: {source}")]
    StoresFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stores file: {0}")]
    StoresFileParse(#[from] serde_yaml::Error),

    #[error("stores file validation failed: {0}")]
    Validation(String),
}
