//! Dataset catalog and ingestion errors

use thiserror::Error;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Dataset lifecycle, ingestion and persistence errors
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Dataset id is empty, whitespace-only, or contains an underscore
    #[error("invalid dataset id: \"{0}\"")]
    InvalidId(String),

    /// Dataset id is already stored
    #[error("dataset already exists: {0}")]
    AlreadyExists(String),

    /// Dataset id is not stored
    #[error("dataset not found: {0}")]
    NotFound(String),

    /// Archive content could not be decoded or unpacked
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// Archive unpacked but yielded zero sections
    #[error("archive contains no valid section")]
    NoValidSections,

    /// Persisted catalog failed its integrity check
    #[error("catalog corrupted: {0}")]
    CatalogCorrupted(String),

    /// Filesystem failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog (de)serialization failure
    #[error("catalog serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
