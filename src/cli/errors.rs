//! CLI error type
//!
//! One wrapper over the dataset and query error taxonomies plus the I/O
//! failures of reading command input.

use thiserror::Error;

use crate::dataset::DatasetError;
use crate::query::QueryError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Dataset(#[from] DatasetError),

    #[error("{0}")]
    Query(#[from] QueryError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid query document: {0}")]
    BadDocument(#[from] serde_json::Error),
}
