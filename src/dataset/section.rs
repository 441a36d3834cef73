//! Course section records
//!
//! A section is an immutable flat row: five numeric fields and five string
//! fields. Sections are produced by ingestion and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric section fields, comparable with LT/GT/EQ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Avg,
    Pass,
    Fail,
    Audit,
    Year,
}

impl NumericField {
    /// Parses a bare field name, without its dataset-id prefix.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "avg" => Some(NumericField::Avg),
            "pass" => Some(NumericField::Pass),
            "fail" => Some(NumericField::Fail),
            "audit" => Some(NumericField::Audit),
            "year" => Some(NumericField::Year),
            _ => None,
        }
    }

    /// Returns the bare field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericField::Avg => "avg",
            NumericField::Pass => "pass",
            NumericField::Fail => "fail",
            NumericField::Audit => "audit",
            NumericField::Year => "year",
        }
    }
}

/// String section fields, matchable with IS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    Dept,
    Id,
    Instructor,
    Title,
    Uuid,
}

impl StringField {
    /// Parses a bare field name, without its dataset-id prefix.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "dept" => Some(StringField::Dept),
            "id" => Some(StringField::Id),
            "instructor" => Some(StringField::Instructor),
            "title" => Some(StringField::Title),
            "uuid" => Some(StringField::Uuid),
            _ => None,
        }
    }

    /// Returns the bare field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringField::Dept => "dept",
            StringField::Id => "id",
            StringField::Instructor => "instructor",
            StringField::Title => "title",
            StringField::Uuid => "uuid",
        }
    }
}

/// Any section field, numeric or string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Numeric(NumericField),
    String(StringField),
}

impl Field {
    /// Parses a bare field name from the union of both field sets.
    pub fn parse(name: &str) -> Option<Self> {
        NumericField::parse(name)
            .map(Field::Numeric)
            .or_else(|| StringField::parse(name).map(Field::String))
    }

    /// Returns the bare field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Numeric(field) => field.as_str(),
            Field::String(field) => field.as_str(),
        }
    }
}

/// One immutable course section row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub uuid: String,
    pub id: String,
    pub title: String,
    pub instructor: String,
    pub dept: String,
    pub year: f64,
    pub avg: f64,
    pub pass: f64,
    pub fail: f64,
    pub audit: f64,
}

impl Section {
    /// Returns the value of a numeric field.
    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Avg => self.avg,
            NumericField::Pass => self.pass,
            NumericField::Fail => self.fail,
            NumericField::Audit => self.audit,
            NumericField::Year => self.year,
        }
    }

    /// Returns the value of a string field.
    pub fn string(&self, field: StringField) -> &str {
        match field {
            StringField::Dept => &self.dept,
            StringField::Id => &self.id,
            StringField::Instructor => &self.instructor,
            StringField::Title => &self.title,
            StringField::Uuid => &self.uuid,
        }
    }

    /// Returns any field as a JSON value of the matching kind.
    pub fn value(&self, field: Field) -> Value {
        match field {
            Field::Numeric(field) => Value::from(self.numeric(field)),
            Field::String(field) => Value::from(self.string(field)),
        }
    }
}
