//! Error type shared by the mapping sources and the URL store

use thiserror::Error;

/// Result type for mapping and store operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid YAML path mapping: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON path mapping: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to create urlmap schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("urlmap query failed: {0}")]
    Query(#[source] rusqlite::Error),

    #[error("database unavailable: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the source bytes were malformed or had the wrong shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Yaml(_) | Error::Json(_))
    }
}
