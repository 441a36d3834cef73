//! Result projection and ordering
//!
//! Projects matched sections onto the requested columns and applies the
//! optional single-key ascending sort. Rows are JSON objects keyed by bare
//! field names in column order (the map preserves insertion order); the
//! dataset-id prefix is added later, at the output boundary.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::dataset::{Field, Section};

use super::ast::Options;
use super::errors::{QueryError, QueryResult};

/// A projected result row keyed by bare field names
pub type ResultRow = Map<String, Value>;

/// Projects and orders matched records
pub struct ResultShaper;

impl ResultShaper {
    /// Builds one row per match with exactly the requested columns, in
    /// column order, then sorts by `options.order_by` when set. The sort is
    /// stable: ties keep their evaluation order.
    pub fn shape(
        sections: &[Section],
        matches: &[usize],
        options: &Options,
    ) -> QueryResult<Vec<ResultRow>> {
        let mut rows = Vec::with_capacity(matches.len());
        for &index in matches {
            let section = sections.get(index).ok_or_else(|| {
                QueryError::invalid(format!("match position {} is out of range", index))
            })?;
            let mut row = ResultRow::new();
            for field in &options.columns {
                row.insert(field.as_str().to_string(), section.value(*field));
            }
            rows.push(row);
        }

        if let Some(order_by) = options.order_by {
            Self::sort_rows(&mut rows, order_by)?;
        }
        Ok(rows)
    }

    /// Ascending sort on one column. Every value must be of the column's
    /// primitive kind; a missing or mismatched value fails the query. This
    /// check runs at sort time, after filtering and projection, and is
    /// deliberately distinct from parse-time validation.
    fn sort_rows(rows: &mut [ResultRow], order_by: Field) -> QueryResult<()> {
        let column = order_by.as_str();
        for row in rows.iter() {
            match row.get(column) {
                Some(Value::Number(_)) if matches!(order_by, Field::Numeric(_)) => {}
                Some(Value::String(_)) if matches!(order_by, Field::String(_)) => {}
                Some(other) => {
                    return Err(QueryError::invalid(format!(
                        "inconsistent value kind for sort column \"{}\": {}",
                        column, other
                    )))
                }
                None => {
                    return Err(QueryError::invalid(format!(
                        "missing value for sort column \"{}\"",
                        column
                    )))
                }
            }
        }
        rows.sort_by(|a, b| Self::compare_values(a.get(column), b.get(column)));
        Ok(())
    }

    /// Compares two column values of the same primitive kind. Numbers sort
    /// in numeric order, strings in codepoint order.
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (Some(Value::Number(a)), Some(Value::Number(b))) => {
                let a = a.as_f64().unwrap_or(0.0);
                let b = b.as_f64().unwrap_or(0.0);
                a.partial_cmp(&b).unwrap_or(Ordering::Equal)
            }
            (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
            // unreachable after the kind check in sort_rows
            _ => Ordering::Equal,
        }
    }
}
