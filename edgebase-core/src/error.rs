use thiserror::Error;

#[derive(Error, Debug)]
pub enum EdgebaseError {
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid edge strength: {0}")]
    InvalidStrength(f64),

    #[error("Invalid timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl EdgebaseError {
    /// True when the failure came from the storage layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, EdgebaseError::Storage(_))
    }
}
