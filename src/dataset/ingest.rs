//! Dataset ingestion
//!
//! Unpacks a base64-encoded tar archive of course files and parses the raw
//! course records into sections. Malformed files and records are skipped;
//! only an archive yielding zero sections is an error. Raw values coerce
//! loosely: numbers stringify for string fields and numeric strings parse
//! for numeric fields, matching the shape of the upstream data.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use tar::Archive;

use super::errors::{DatasetError, DatasetResult};
use super::section::Section;

/// Top-level folder every course file must live under
const COURSE_FOLDER: &str = "courses/";

/// Sections marked "overall" carry this year
const OVERALL_YEAR: f64 = 1900.0;

/// Keys every raw course record must carry
const RAW_KEYS: [&str; 10] = [
    "id", "Course", "Title", "Professor", "Subject", "Year", "Avg", "Pass", "Fail", "Audit",
];

/// Decodes a base64 tar archive and parses its course files into sections.
pub fn ingest_archive(content_b64: &str) -> DatasetResult<Vec<Section>> {
    let bytes = STANDARD
        .decode(content_b64.trim())
        .map_err(|e| DatasetError::InvalidArchive(format!("not base64: {}", e)))?;

    let mut archive = Archive::new(bytes.as_slice());
    let entries = archive
        .entries()
        .map_err(|e| DatasetError::InvalidArchive(format!("not a tar archive: {}", e)))?;

    let mut sections = Vec::new();
    for entry in entries {
        let mut entry =
            entry.map_err(|e| DatasetError::InvalidArchive(format!("unreadable entry: {}", e)))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry
            .path()
            .map_err(|e| DatasetError::InvalidArchive(format!("bad entry path: {}", e)))?
            .to_string_lossy()
            .into_owned();
        if !path.starts_with(COURSE_FOLDER) {
            return Err(DatasetError::InvalidArchive(format!(
                "entry \"{}\" is outside \"{}\"",
                path, COURSE_FOLDER
            )));
        }
        if path.ends_with(".DS_Store") {
            continue;
        }

        let mut content = String::new();
        if entry.read_to_string(&mut content).is_err() {
            continue;
        }
        if content.trim().is_empty() {
            continue;
        }
        let Ok(course) = serde_json::from_str::<Value>(&content) else {
            continue;
        };
        parse_course(&course, &mut sections);
    }

    if sections.is_empty() {
        return Err(DatasetError::NoValidSections);
    }
    Ok(sections)
}

/// Collects the valid records of one course file.
fn parse_course(course: &Value, sections: &mut Vec<Section>) {
    let Some(records) = course.get("result").and_then(Value::as_array) else {
        return;
    };
    for record in records {
        if let Some(section) = parse_record(record) {
            sections.push(section);
        }
    }
}

/// Converts one raw record, or `None` when keys are missing or a numeric
/// field does not coerce to a finite value.
fn parse_record(record: &Value) -> Option<Section> {
    let object = record.as_object()?;
    if RAW_KEYS.iter().any(|key| !object.contains_key(*key)) {
        return None;
    }

    let mut year = coerce_number(object.get("Year")?)?;
    let overall = object
        .get("Section")
        .and_then(Value::as_str)
        .is_some_and(|s| s.eq_ignore_ascii_case("overall"));
    if overall {
        year = OVERALL_YEAR;
    }

    Some(Section {
        uuid: coerce_string(object.get("id")?),
        id: coerce_string(object.get("Course")?),
        title: coerce_string(object.get("Title")?),
        instructor: coerce_string(object.get("Professor")?),
        dept: coerce_string(object.get("Subject")?),
        year,
        avg: coerce_number(object.get("Avg")?)?,
        pass: coerce_number(object.get("Pass")?)?,
        fail: coerce_number(object.get("Fail")?)?,
        audit: coerce_number(object.get("Audit")?)?,
    })
}

/// String coercion in the loose style of the raw data: non-strings
/// stringify.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric coercion: numbers pass through, numeric strings parse; anything
/// else, or a non-finite result, is rejected.
fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
