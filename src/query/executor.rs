//! Query execution pipeline
//!
//! Orchestrates the linear pipeline, strict order:
//!
//! 1. Parse and validate the raw document
//! 2. Look up the fixed dataset id
//! 3. Evaluate the filter tree over the full section set
//! 4. Guard the match count against the result cap
//! 5. Shape (project + sort)
//! 6. Prefix row keys with the dataset id
//!
//! This is the only query component that talks to collaborators, through
//! the `SectionSource` seam. The executor never returns a partial result:
//! a query either yields a complete, fully shaped result array or fails
//! with one typed error, and stored state is never touched.

use serde_json::Value;

use crate::dataset::Section;

use super::errors::{QueryError, QueryResult};
use super::evaluator::FilterEvaluator;
use super::parser::QueryParser;
use super::shaper::{ResultRow, ResultShaper};

/// Upper bound on matched records before shaping is attempted
pub const RESULT_CAP: usize = 5000;

/// Read-only access to loaded datasets
pub trait SectionSource {
    /// Returns the full, ordered section set of a dataset, if loaded.
    fn sections(&self, dataset_id: &str) -> Option<&[Section]>;
}

/// Executes raw query documents against a section source
pub struct QueryExecutor<'a, S: SectionSource> {
    source: &'a S,
}

impl<'a, S: SectionSource> QueryExecutor<'a, S> {
    /// Creates an executor over a section source.
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Runs one query document to completion.
    pub fn execute(&self, document: &Value) -> QueryResult<Vec<ResultRow>> {
        let query = QueryParser::parse(document)?;

        let sections = self
            .source
            .sections(&query.dataset_id)
            .ok_or_else(|| QueryError::DatasetNotFound(query.dataset_id.clone()))?;

        let matches = FilterEvaluator::evaluate(query.filter.as_ref(), sections);
        if matches.len() > RESULT_CAP {
            return Err(QueryError::ResultTooLarge(matches.len()));
        }

        let rows = ResultShaper::shape(sections, &matches, &query.options)?;
        Ok(Self::prefix_keys(rows, &query.dataset_id))
    }

    /// Rewrites every row key from the bare field name to
    /// `"<datasetId>_<field>"`. Runs only at the output boundary.
    fn prefix_keys(rows: Vec<ResultRow>, dataset_id: &str) -> Vec<ResultRow> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(key, value)| (format!("{}_{}", dataset_id, key), value))
                    .collect()
            })
            .collect()
    }
}
