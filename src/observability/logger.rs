//! Structured event log
//!
//! One JSON object per line, written synchronously to stderr so normal
//! command output stays clean. Keys are emitted in deterministic order;
//! every event carries a UTC timestamp.

use std::io::{self, Write};

use chrono::Utc;
use serde_json::{Map, Value};

/// Writes one structured event line.
///
/// Field values are given as strings; the line is a flat JSON object with
/// the event first, then the fields sorted by key, then the timestamp. A
/// write failure is swallowed: logging must never fail an operation.
pub fn log_event(event: &str, fields: &[(&str, &str)]) {
    let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
    sorted.sort_by_key(|(key, _)| *key);

    let mut object = Map::new();
    object.insert("event".to_string(), Value::String(event.to_string()));
    for (key, value) in sorted {
        object.insert((*key).to_string(), Value::String((*value).to_string()));
    }
    object.insert("ts".to_string(), Value::String(Utc::now().to_rfc3339()));

    let mut stderr = io::stderr();
    let _ = writeln!(stderr, "{}", Value::Object(object));
    let _ = stderr.flush();
}
