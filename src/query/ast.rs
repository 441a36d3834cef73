//! Parsed query representation
//!
//! The validated form of a JSON query document: an optional filter tree
//! plus projection and ordering options, all fixed to one dataset id.

use crate::dataset::{Field, NumericField, StringField};

use super::pattern::WildcardPattern;

/// Numeric comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericOp {
    Lt,
    Gt,
    Eq,
}

impl NumericOp {
    /// Returns the operator name as written in query documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericOp::Lt => "LT",
            NumericOp::Gt => "GT",
            NumericOp::Eq => "EQ",
        }
    }

    /// Applies the comparison with the record value on the left.
    /// EQ is exact numeric equality.
    pub fn compare(&self, actual: f64, value: f64) -> bool {
        match self {
            NumericOp::Lt => actual < value,
            NumericOp::Gt => actual > value,
            NumericOp::Eq => actual == value,
        }
    }
}

/// Logical connectives over child filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    /// Returns the connective name as written in query documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicOp::And => "AND",
            LogicOp::Or => "OR",
        }
    }
}

/// One node of the filter tree
#[derive(Debug, Clone)]
pub enum Filter {
    /// Numeric comparison on one field
    Numeric {
        op: NumericOp,
        field: NumericField,
        value: f64,
    },
    /// Wildcard string match on one field
    Text {
        field: StringField,
        pattern: WildcardPattern,
    },
    /// AND/OR over an ordered, non-empty child list
    Logic { op: LogicOp, children: Vec<Filter> },
    /// Complement of the child filter
    Not(Box<Filter>),
}

/// Projection and ordering options
#[derive(Debug, Clone)]
pub struct Options {
    /// Output columns in order; duplicates permitted
    pub columns: Vec<Field>,
    /// Optional ascending sort column; always one of `columns`
    pub order_by: Option<Field>,
}

/// A parsed, validated query
#[derive(Debug, Clone)]
pub struct Query {
    /// Dataset id every field reference in the query agrees on
    pub dataset_id: String,
    /// `None` means match-all (empty WHERE)
    pub filter: Option<Filter>,
    /// Projection and ordering
    pub options: Options,
}
