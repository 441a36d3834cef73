//! Wildcard pattern compilation
//!
//! `*` is meaningful only as the first character, the last character, or
//! both; a `*` strictly inside the pattern is rejected. The remaining
//! literal text is regex-escaped before compilation, so no other character
//! is ever treated as pattern syntax.

use regex::Regex;

use super::errors::{QueryError, QueryResult};

/// A compiled string-match predicate
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    /// Compiles a wildcard spec into an anchored matcher.
    ///
    /// A leading `*` relaxes the start anchor, a trailing `*` relaxes the
    /// end anchor; neither gives a full-string exact match, both give an
    /// unanchored containment match. The interior is checked once the outer
    /// characters are stripped.
    pub fn compile(spec: &str) -> QueryResult<Self> {
        let leading = spec.starts_with('*');
        let trailing = spec.ends_with('*');

        let body = spec.strip_prefix('*').unwrap_or(spec);
        let body = body.strip_suffix('*').unwrap_or(body);
        if body.contains('*') {
            return Err(QueryError::invalid(format!(
                "invalid wildcard placement in \"{}\"",
                spec
            )));
        }

        let escaped = regex::escape(body);
        let source = match (leading, trailing) {
            (true, true) => escaped,
            (true, false) => format!("{}$", escaped),
            (false, true) => format!("^{}", escaped),
            (false, false) => format!("^{}$", escaped),
        };

        let regex = Regex::new(&source).map_err(|e| {
            QueryError::invalid(format!("unusable pattern \"{}\": {}", spec, e))
        })?;
        Ok(Self { regex })
    }

    /// Tests a string field value against the pattern. Case-sensitive.
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}
