//! Query Semantics Tests
//!
//! End-to-end tests through the query executor:
//! - Filter set algebra (AND/OR/NOT) over a fixed table
//! - Wildcard matching and rejection
//! - The 5000-row result cap boundary
//! - Projection exactness and sort order
//! - Fail-fast validation before evaluation

use std::collections::HashMap;
use std::collections::HashSet;

use coursedb::dataset::Section;
use coursedb::query::{QueryError, QueryExecutor, ResultRow, SectionSource, RESULT_CAP};
use serde_json::{json, Value};

// =============================================================================
// Helpers
// =============================================================================

struct MemorySource {
    tables: HashMap<String, Vec<Section>>,
}

impl SectionSource for MemorySource {
    fn sections(&self, dataset_id: &str) -> Option<&[Section]> {
        self.tables.get(dataset_id).map(Vec::as_slice)
    }
}

fn section(uuid: &str, dept: &str, instructor: &str, avg: f64, year: f64) -> Section {
    Section {
        uuid: uuid.to_string(),
        id: "110".to_string(),
        title: "intro".to_string(),
        instructor: instructor.to_string(),
        dept: dept.to_string(),
        year,
        avg,
        pass: 100.0,
        fail: 10.0,
        audit: 1.0,
    }
}

/// A small fixed table under dataset id "d".
fn small_source() -> MemorySource {
    let sections = vec![
        section("1", "cpsc", "kiczales", 90.0, 2015.0),
        section("2", "math", "gordon", 70.0, 2014.0),
        section("3", "cpsc", "wolfman", 95.0, 2016.0),
        section("4", "biol", "adams", 80.0, 1900.0),
        section("5", "chem", "stewart", 60.0, 2015.0),
    ];
    let mut tables = HashMap::new();
    tables.insert("d".to_string(), sections);
    MemorySource { tables }
}

fn run(source: &MemorySource, document: Value) -> Result<Vec<ResultRow>, QueryError> {
    QueryExecutor::new(source).execute(&document)
}

fn uuids(rows: &[ResultRow]) -> HashSet<String> {
    rows.iter()
        .map(|row| row["d_uuid"].as_str().unwrap().to_string())
        .collect()
}

/// Runs a WHERE filter projecting uuids, returning the matched set.
fn matched(source: &MemorySource, filter: Value) -> HashSet<String> {
    let rows = run(
        source,
        json!({
            "WHERE": filter,
            "OPTIONS": { "COLUMNS": ["d_uuid"] }
        }),
    )
    .unwrap();
    uuids(&rows)
}

// =============================================================================
// Set Algebra
// =============================================================================

#[test]
fn test_and_equals_intersection() {
    let source = small_source();
    let left = matched(&source, json!({ "GT": { "d_avg": 75 } }));
    let right = matched(&source, json!({ "IS": { "d_dept": "cpsc" } }));
    let both = matched(
        &source,
        json!({ "AND": [ { "GT": { "d_avg": 75 } }, { "IS": { "d_dept": "cpsc" } } ] }),
    );

    let expected: HashSet<String> = left.intersection(&right).cloned().collect();
    assert_eq!(both, expected);
}

#[test]
fn test_or_equals_union_and_is_commutative() {
    let source = small_source();
    let left = matched(&source, json!({ "LT": { "d_avg": 75 } }));
    let right = matched(&source, json!({ "EQ": { "d_year": 1900 } }));
    let either = matched(
        &source,
        json!({ "OR": [ { "LT": { "d_avg": 75 } }, { "EQ": { "d_year": 1900 } } ] }),
    );
    let reversed = matched(
        &source,
        json!({ "OR": [ { "EQ": { "d_year": 1900 } }, { "LT": { "d_avg": 75 } } ] }),
    );

    let expected: HashSet<String> = left.union(&right).cloned().collect();
    assert_eq!(either, expected);
    assert_eq!(reversed, expected);
}

#[test]
fn test_not_partitions_the_table() {
    let source = small_source();
    let inside = matched(&source, json!({ "GT": { "d_avg": 75 } }));
    let outside = matched(&source, json!({ "NOT": { "GT": { "d_avg": 75 } } }));
    let everything = matched(&source, json!({ "GT": { "d_avg": 0 } }));

    assert!(inside.is_disjoint(&outside));
    let union: HashSet<String> = inside.union(&outside).cloned().collect();
    assert_eq!(union, everything);
}

#[test]
fn test_eq_is_exact() {
    let source = small_source();
    assert_eq!(
        matched(&source, json!({ "EQ": { "d_avg": 70 } })),
        HashSet::from(["2".to_string()])
    );
    assert!(matched(&source, json!({ "EQ": { "d_avg": 70.0001 } })).is_empty());
}

// =============================================================================
// Wildcards
// =============================================================================

#[test]
fn test_wildcard_forms_end_to_end() {
    let source = small_source();

    // prefix
    assert_eq!(
        matched(&source, json!({ "IS": { "d_instructor": "w*" } })),
        HashSet::from(["3".to_string()])
    );
    // suffix
    assert_eq!(
        matched(&source, json!({ "IS": { "d_instructor": "*man" } })),
        HashSet::from(["3".to_string()])
    );
    // containment
    assert_eq!(
        matched(&source, json!({ "IS": { "d_dept": "*h*" } })),
        HashSet::from(["2".to_string(), "5".to_string()])
    );
    // exact
    assert_eq!(
        matched(&source, json!({ "IS": { "d_dept": "biol" } })),
        HashSet::from(["4".to_string()])
    );
}

#[test]
fn test_interior_wildcard_rejected_before_evaluation() {
    let source = small_source();
    let result = run(
        &source,
        json!({
            "WHERE": { "IS": { "d_dept": "c*s*" } },
            "OPTIONS": { "COLUMNS": ["d_uuid"] }
        }),
    );
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
}

// =============================================================================
// Result Cap
// =============================================================================

#[test]
fn test_result_cap_on_large_table() {
    // 6000 rows with avg 0..5999
    let sections: Vec<Section> = (0..6000)
        .map(|i| section(&i.to_string(), "cpsc", "smith", i as f64, 2015.0))
        .collect();
    let mut tables = HashMap::new();
    tables.insert("big".to_string(), sections);
    let source = MemorySource { tables };
    let executor = QueryExecutor::new(&source);

    // exactly 5001 matches -> ResultTooLarge
    let result = executor.execute(&json!({
        "WHERE": { "LT": { "big_avg": 5001 } },
        "OPTIONS": { "COLUMNS": ["big_avg"] }
    }));
    assert_eq!(result, Err(QueryError::ResultTooLarge(RESULT_CAP + 1)));

    // exactly 5000 matches -> full result
    let rows = executor
        .execute(&json!({
            "WHERE": { "LT": { "big_avg": 5000 } },
            "OPTIONS": { "COLUMNS": ["big_avg"] }
        }))
        .unwrap();
    assert_eq!(rows.len(), RESULT_CAP);
}

// =============================================================================
// Projection and Sort
// =============================================================================

#[test]
fn test_projection_exactness() {
    let source = small_source();
    let rows = run(
        &source,
        json!({
            "WHERE": {},
            "OPTIONS": { "COLUMNS": ["d_avg", "d_dept"] }
        }),
    )
    .unwrap();

    assert_eq!(rows.len(), 5);
    for row in &rows {
        let keys: Vec<&str> = row.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["d_avg", "d_dept"]);
    }
}

#[test]
fn test_projection_preserves_column_order() {
    // column order is output order, even when it is not alphabetical
    let source = small_source();
    let rows = run(
        &source,
        json!({
            "WHERE": { "EQ": { "d_avg": 90 } },
            "OPTIONS": { "COLUMNS": ["d_dept", "d_avg", "d_uuid"] }
        }),
    )
    .unwrap();

    let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["d_dept", "d_avg", "d_uuid"]);
}

#[test]
fn test_numeric_sort_ascending() {
    let source = small_source();
    let rows = run(
        &source,
        json!({
            "WHERE": {},
            "OPTIONS": { "COLUMNS": ["d_avg"], "ORDER": "d_avg" }
        }),
    )
    .unwrap();

    let avgs: Vec<f64> = rows.iter().map(|row| row["d_avg"].as_f64().unwrap()).collect();
    assert_eq!(avgs, vec![60.0, 70.0, 80.0, 90.0, 95.0]);
}

#[test]
fn test_string_sort_ascending() {
    let source = small_source();
    let rows = run(
        &source,
        json!({
            "WHERE": {},
            "OPTIONS": { "COLUMNS": ["d_dept"], "ORDER": "d_dept" }
        }),
    )
    .unwrap();

    let depts: Vec<&str> = rows.iter().map(|row| row["d_dept"].as_str().unwrap()).collect();
    assert_eq!(depts, vec!["biol", "chem", "cpsc", "cpsc", "math"]);
}

#[test]
fn test_end_to_end_scenario() {
    let sections = vec![
        section("1", "cpsc", "a", 90.0, 2015.0),
        section("2", "math", "b", 70.0, 2015.0),
        section("3", "cpsc", "c", 95.0, 2015.0),
    ];
    let mut tables = HashMap::new();
    tables.insert("d".to_string(), sections);
    let source = MemorySource { tables };

    let rows = run(
        &source,
        json!({
            "WHERE": { "GT": { "d_avg": 80 } },
            "OPTIONS": { "COLUMNS": ["d_avg", "d_dept"], "ORDER": "d_avg" }
        }),
    )
    .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["d_avg"], json!(90.0));
    assert_eq!(rows[0]["d_dept"], json!("cpsc"));
    assert_eq!(rows[1]["d_avg"], json!(95.0));
    assert_eq!(rows[1]["d_dept"], json!("cpsc"));
}

// =============================================================================
// Fail-fast Validation
// =============================================================================

#[test]
fn test_cross_dataset_mismatch_fails_before_evaluation() {
    // dataset "d" exists, "e" does not; the mismatch must win over lookup
    let source = small_source();
    let result = run(
        &source,
        json!({
            "WHERE": { "GT": { "d_avg": 80 } },
            "OPTIONS": { "COLUMNS": ["e_dept"] }
        }),
    );
    assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
}

#[test]
fn test_missing_dataset_is_its_own_error() {
    let source = small_source();
    let result = run(
        &source,
        json!({
            "WHERE": {},
            "OPTIONS": { "COLUMNS": ["ghost_dept"] }
        }),
    );
    assert_eq!(result, Err(QueryError::DatasetNotFound("ghost".to_string())));
}

#[test]
fn test_failures_never_return_partial_results() {
    let source = small_source();
    for document in [
        json!({ "WHERE": { "AND": [] }, "OPTIONS": { "COLUMNS": ["d_avg"] } }),
        json!({ "WHERE": { "XOR": [{}] }, "OPTIONS": { "COLUMNS": ["d_avg"] } }),
        json!({ "WHERE": {}, "OPTIONS": { "COLUMNS": [] } }),
        json!({ "WHERE": {}, "OPTIONS": { "COLUMNS": ["d_avg"], "ORDER": "d_dept" } }),
    ] {
        let result = run(&source, document);
        assert!(matches!(result, Err(QueryError::InvalidQuery(_))));
    }
}
