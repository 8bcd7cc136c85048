//! Structured-query sanitizer: strips operator and prototype-pollution keys
//! from untyped filter objects.

use serde_json::{Map, Value};

/// Counts of what [`QuerySanitizer::sanitize_with_report`] removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryReport {
    /// Keys dropped because they start with the operator prefix or are
    /// denylisted outright.
    pub removed_keys: usize,
    /// Containers nested deeper than the depth limit, replaced with `null`.
    pub truncated_branches: usize,
}

impl QueryReport {
    /// Returns `true` if the input came back unchanged.
    pub fn is_clean(&self) -> bool {
        self.removed_keys == 0 && self.truncated_branches == 0
    }
}

/// Builds a deep copy of a JSON value without dangerous keys.
///
/// At every nesting level, inside objects and inside array elements, a key
/// is dropped if it starts with the operator prefix (`$` by default) or
/// equals a forbidden key (`__proto__`, `constructor`, `prototype`). Scalar
/// values are returned as-is: this sanitizer does not touch string content.
///
/// The walk carries an explicit depth counter. An object or array at depth
/// `max_depth` (the root is depth 0) is replaced with `null` instead of
/// being descended into.
///
/// # Example
///
/// ```
/// use input_guard::QuerySanitizer;
/// use serde_json::json;
///
/// let queries = QuerySanitizer::new('$', &["__proto__", "constructor", "prototype"], 32);
/// let clean = queries.sanitize(&json!({"$ne": null, "normal": "value"}));
/// assert_eq!(clean, json!({"normal": "value"}));
/// ```
#[derive(Debug, Clone)]
pub struct QuerySanitizer {
    operator_prefix: char,
    forbidden_keys: Vec<String>,
    max_depth: usize,
}

impl QuerySanitizer {
    /// Create a query sanitizer.
    pub fn new<S: AsRef<str>>(operator_prefix: char, forbidden_keys: &[S], max_depth: usize) -> Self {
        Self {
            operator_prefix,
            forbidden_keys: forbidden_keys.iter().map(|k| k.as_ref().to_string()).collect(),
            max_depth,
        }
    }

    /// Returns `true` if `key` must not survive sanitization.
    pub fn is_forbidden_key(&self, key: &str) -> bool {
        key.starts_with(self.operator_prefix) || self.forbidden_keys.iter().any(|k| k == key)
    }

    /// Return a sanitized deep copy of `input`.
    pub fn sanitize(&self, input: &Value) -> Value {
        self.sanitize_with_report(input).0
    }

    /// Return a sanitized deep copy of `input` along with what was removed.
    pub fn sanitize_with_report(&self, input: &Value) -> (Value, QueryReport) {
        let mut report = QueryReport::default();
        let value = self.walk(input, 0, &mut report);

        if report.truncated_branches > 0 {
            tracing::warn!(
                truncated = report.truncated_branches,
                max_depth = self.max_depth,
                "Query exceeded depth limit, deep branches replaced with null"
            );
        }
        (value, report)
    }

    fn walk(&self, value: &Value, depth: usize, report: &mut QueryReport) -> Value {
        match value {
            Value::Object(_) | Value::Array(_) if depth >= self.max_depth => {
                report.truncated_branches += 1;
                Value::Null
            }
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, child) in map {
                    if self.is_forbidden_key(key) {
                        tracing::debug!(key = %key, depth, "Dropping forbidden query key");
                        report.removed_keys += 1;
                        continue;
                    }
                    out.insert(key.clone(), self.walk(child, depth + 1, report));
                }
                Value::Object(out)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.walk(item, depth + 1, report))
                    .collect(),
            ),
            scalar => scalar.clone(),
        }
    }
}
