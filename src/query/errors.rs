//! Query error types
//!
//! Three kinds cover the whole query path: a malformed or inconsistent
//! query document, a reference to a dataset that is not loaded, and a match
//! set larger than the result cap. Validation is fail-fast, so the first
//! violation carries the whole story in its message.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Malformed document or failed validation rule
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Referenced dataset id has no loaded table
    #[error("dataset not found: {0}")]
    DatasetNotFound(String),

    /// Match count exceeds the result cap
    #[error("result too large: {0} matches exceed the 5000 row cap")]
    ResultTooLarge(usize),
}

impl QueryError {
    /// Create an invalid-query error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidQuery(message.into())
    }
}
