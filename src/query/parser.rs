//! Query document parser
//!
//! Converts a raw JSON query document into a validated `Query`. Validation
//! is fail-fast and total: the first rule violation aborts the parse before
//! evaluation ever touches data. The dataset id fixed by the first field
//! reference is threaded through an explicit context value, so the parser
//! is reentrant and has no shared state.

use serde_json::Value;

use crate::dataset::{Field, NumericField, StringField};

use super::ast::{Filter, LogicOp, NumericOp, Options, Query};
use super::errors::{QueryError, QueryResult};
use super::pattern::WildcardPattern;

/// Dataset id context fixed by the first field reference seen
#[derive(Debug, Default)]
struct ParseContext {
    dataset_id: Option<String>,
}

impl ParseContext {
    /// Fixes the dataset id on first use; every later reference must agree.
    fn bind(&mut self, id: &str) -> QueryResult<()> {
        match &self.dataset_id {
            None => {
                self.dataset_id = Some(id.to_string());
                Ok(())
            }
            Some(fixed) if fixed == id => Ok(()),
            Some(fixed) => Err(QueryError::invalid(format!(
                "query references multiple dataset ids: \"{}\" and \"{}\"",
                fixed, id
            ))),
        }
    }
}

/// Parses raw query documents into validated queries
pub struct QueryParser;

impl QueryParser {
    /// Parses and validates a raw query document.
    pub fn parse(document: &Value) -> QueryResult<Query> {
        let root = document
            .as_object()
            .ok_or_else(|| QueryError::invalid("query must be a JSON object"))?;

        for key in root.keys() {
            if key != "WHERE" && key != "OPTIONS" {
                return Err(QueryError::invalid(format!(
                    "invalid key \"{}\" in query",
                    key
                )));
            }
        }
        let where_value = root
            .get("WHERE")
            .ok_or_else(|| QueryError::invalid("query is missing WHERE"))?;
        let options_value = root
            .get("OPTIONS")
            .ok_or_else(|| QueryError::invalid("query is missing OPTIONS"))?;

        let mut context = ParseContext::default();
        let filter = Self::parse_where(where_value, &mut context)?;
        let options = Self::parse_options(options_value, &mut context)?;

        // COLUMNS is non-empty, so a reference has always bound by now.
        let dataset_id = context
            .dataset_id
            .ok_or_else(|| QueryError::invalid("query fixes no dataset id"))?;

        Ok(Query {
            dataset_id,
            filter,
            options,
        })
    }

    /// WHERE clause: an empty object means match-all, otherwise exactly one
    /// filter.
    fn parse_where(value: &Value, context: &mut ParseContext) -> QueryResult<Option<Filter>> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("WHERE must be an object"))?;
        if object.is_empty() {
            return Ok(None);
        }
        if object.len() > 1 {
            return Err(QueryError::invalid(
                "WHERE has multiple filters at the top level",
            ));
        }
        Ok(Some(Self::parse_filter(value, context)?))
    }

    /// A filter object: exactly one operator key.
    fn parse_filter(value: &Value, context: &mut ParseContext) -> QueryResult<Filter> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("filter must be an object"))?;
        if object.len() != 1 {
            return Err(QueryError::invalid(format!(
                "filter must have exactly one key, found {}",
                object.len()
            )));
        }
        let (key, operand) = object
            .iter()
            .next()
            .ok_or_else(|| QueryError::invalid("filter must have exactly one key"))?;

        match key.as_str() {
            "AND" => Self::parse_logic(LogicOp::And, operand, context),
            "OR" => Self::parse_logic(LogicOp::Or, operand, context),
            "LT" => Self::parse_numeric(NumericOp::Lt, operand, context),
            "GT" => Self::parse_numeric(NumericOp::Gt, operand, context),
            "EQ" => Self::parse_numeric(NumericOp::Eq, operand, context),
            "IS" => Self::parse_text(operand, context),
            "NOT" => Ok(Filter::Not(Box::new(Self::parse_filter(operand, context)?))),
            other => Err(QueryError::invalid(format!(
                "unknown filter operator \"{}\"",
                other
            ))),
        }
    }

    /// AND/OR: a non-empty array of filters, parsed recursively.
    fn parse_logic(
        op: LogicOp,
        operand: &Value,
        context: &mut ParseContext,
    ) -> QueryResult<Filter> {
        let items = operand.as_array().ok_or_else(|| {
            QueryError::invalid(format!("{} expects an array of filters", op.as_str()))
        })?;
        if items.is_empty() {
            return Err(QueryError::invalid(format!(
                "{} must have at least one filter",
                op.as_str()
            )));
        }
        let children = items
            .iter()
            .map(|item| Self::parse_filter(item, context))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Filter::Logic { op, children })
    }

    /// LT/GT/EQ: `{ "<id>_<numfield>": number }` with a finite value.
    fn parse_numeric(
        op: NumericOp,
        operand: &Value,
        context: &mut ParseContext,
    ) -> QueryResult<Filter> {
        let (reference, value) = Self::single_entry(operand, op.as_str())?;
        let (id, field_name) = split_reference(reference)?;
        context.bind(id)?;

        let field = NumericField::parse(field_name).ok_or_else(|| {
            QueryError::invalid(format!("invalid numeric field name \"{}\"", field_name))
        })?;
        let number = value
            .as_f64()
            .filter(|n| n.is_finite())
            .ok_or_else(|| {
                QueryError::invalid(format!(
                    "{} expects a finite number, got {}",
                    op.as_str(),
                    value
                ))
            })?;

        Ok(Filter::Numeric {
            op,
            field,
            value: number,
        })
    }

    /// IS: `{ "<id>_<strfield>": wildcard-string }`.
    fn parse_text(operand: &Value, context: &mut ParseContext) -> QueryResult<Filter> {
        let (reference, value) = Self::single_entry(operand, "IS")?;
        let (id, field_name) = split_reference(reference)?;
        context.bind(id)?;

        let field = StringField::parse(field_name).ok_or_else(|| {
            QueryError::invalid(format!("invalid string field name \"{}\"", field_name))
        })?;
        let spec = value.as_str().ok_or_else(|| {
            QueryError::invalid(format!("IS expects a string, got {}", value))
        })?;
        let pattern = WildcardPattern::compile(spec)?;

        Ok(Filter::Text { field, pattern })
    }

    /// The single `"<id>_<field>": value` entry of a comparison object.
    fn single_entry<'a>(operand: &'a Value, op: &str) -> QueryResult<(&'a str, &'a Value)> {
        let object = operand.as_object().ok_or_else(|| {
            QueryError::invalid(format!("{} expects an object", op))
        })?;
        if object.len() != 1 {
            return Err(QueryError::invalid(format!(
                "{} must have exactly one key, found {}",
                op,
                object.len()
            )));
        }
        object
            .iter()
            .next()
            .map(|(key, value)| (key.as_str(), value))
            .ok_or_else(|| QueryError::invalid(format!("{} must have exactly one key", op)))
    }

    /// OPTIONS: non-empty COLUMNS plus an optional ORDER drawn from COLUMNS.
    fn parse_options(value: &Value, context: &mut ParseContext) -> QueryResult<Options> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::invalid("OPTIONS must be an object"))?;
        for key in object.keys() {
            if key != "COLUMNS" && key != "ORDER" {
                return Err(QueryError::invalid(format!(
                    "invalid key \"{}\" in OPTIONS",
                    key
                )));
            }
        }

        let entries = object
            .get("COLUMNS")
            .ok_or_else(|| QueryError::invalid("OPTIONS is missing COLUMNS"))?
            .as_array()
            .ok_or_else(|| QueryError::invalid("COLUMNS must be an array"))?;
        if entries.is_empty() {
            return Err(QueryError::invalid("COLUMNS must not be empty"));
        }

        let mut columns = Vec::with_capacity(entries.len());
        for entry in entries {
            let reference = entry.as_str().ok_or_else(|| {
                QueryError::invalid(format!("COLUMNS entry must be a string, got {}", entry))
            })?;
            let (id, field_name) = split_reference(reference)?;
            context.bind(id)?;
            let field = Field::parse(field_name).ok_or_else(|| {
                QueryError::invalid(format!("invalid field name \"{}\"", field_name))
            })?;
            columns.push(field);
        }

        let order_by = match object.get("ORDER") {
            None => None,
            Some(order_value) => {
                let reference = order_value
                    .as_str()
                    .ok_or_else(|| QueryError::invalid("ORDER must be a string"))?;
                let (id, field_name) = split_reference(reference)?;
                context.bind(id)?;
                let field = Field::parse(field_name).ok_or_else(|| {
                    QueryError::invalid(format!(
                        "invalid field name \"{}\" in ORDER",
                        field_name
                    ))
                })?;
                if !columns.contains(&field) {
                    return Err(QueryError::invalid(format!(
                        "ORDER key \"{}\" must appear in COLUMNS",
                        reference
                    )));
                }
                Some(field)
            }
        };

        Ok(Options { columns, order_by })
    }
}

/// Splits a `"<id>_<field>"` reference at its first underscore. A key with
/// no underscore, or one starting with an underscore, is invalid.
fn split_reference(key: &str) -> QueryResult<(&str, &str)> {
    match key.split_once('_') {
        Some((id, field)) if !id.is_empty() => Ok((id, field)),
        _ => Err(QueryError::invalid(format!(
            "invalid key \"{}\", expected \"<id>_<field>\"",
            key
        ))),
    }
}
