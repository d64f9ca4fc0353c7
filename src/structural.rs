//! Structural comparison of JSON trees.
//!
//! Both sides of a structured check are reduced to [`serde_json::Value`] and
//! walked together. [`CompareOptions`] lets a session ignore fields that are
//! irrelevant to the output under test.

use std::fmt;

use serde_json::Value;

/// Session-level options for structural comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareOptions {
    ignored_fields: Vec<String>,
    ignored_paths: Vec<Vec<String>>,
    equate_empty: bool,
}

impl CompareOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignores every object key named `name`, at any depth.
    pub fn ignore_field(mut self, name: impl Into<String>) -> Self {
        self.ignored_fields.push(name.into());
        self
    }

    /// Ignores the value at a dot-separated path from the root.
    ///
    /// `*` matches any key or array index: `"items.*.id"`.
    pub fn ignore_path(mut self, path: &str) -> Self {
        self.ignored_paths
            .push(path.split('.').map(str::to_string).collect());
        self
    }

    /// Treats `null`, `[]` and `{}` as equal.
    pub fn equate_empty(mut self, yes: bool) -> Self {
        self.equate_empty = yes;
        self
    }

    fn ignores(&self, segments: &[String]) -> bool {
        if let Some(last) = segments.last() {
            if self.ignored_fields.iter().any(|f| f == last) && !is_index(last) {
                return true;
            }
        }
        self.ignored_paths.iter().any(|pattern| {
            pattern.len() == segments.len()
                && pattern
                    .iter()
                    .zip(segments)
                    .all(|(p, s)| p == "*" || p == s)
        })
    }
}

fn is_index(segment: &str) -> bool {
    segment.starts_with('[')
}

// ============================================================================
// DIFF
// ============================================================================

/// One leaf-level structural mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDiff {
    pub path: String,
    pub want: Option<Value>,
    pub got: Option<Value>,
}

impl fmt::Display for FieldDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: &Option<Value>| match v {
            Some(v) => v.to_string(),
            None => "<absent>".to_string(),
        };
        write!(
            f,
            "{}: want {}, got {}",
            self.path,
            show(&self.want),
            show(&self.got)
        )
    }
}

/// Walks `want` and `got` together and returns every mismatch not covered by
/// `options`. An empty result means structurally equal.
pub fn diff_values(want: &Value, got: &Value, options: &CompareOptions) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();
    let mut segments = Vec::new();
    walk(want, got, options, &mut segments, &mut diffs);
    diffs
}

/// Renders a structural diff as one line per mismatch.
pub fn render(diffs: &[FieldDiff]) -> String {
    diffs
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn walk(
    want: &Value,
    got: &Value,
    options: &CompareOptions,
    segments: &mut Vec<String>,
    diffs: &mut Vec<FieldDiff>,
) {
    if options.ignores(segments) {
        return;
    }
    if options.equate_empty && is_empty(want) && is_empty(got) {
        return;
    }

    match (want, got) {
        (Value::Object(w), Value::Object(g)) => {
            let mut keys: Vec<&String> = w.keys().chain(g.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                segments.push(key.clone());
                match (w.get(key), g.get(key)) {
                    (Some(wv), Some(gv)) => walk(wv, gv, options, segments, diffs),
                    (wv, gv) => {
                        if !options.ignores(segments) {
                            diffs.push(field_diff(segments, wv.cloned(), gv.cloned()));
                        }
                    }
                }
                segments.pop();
            }
        }
        (Value::Array(w), Value::Array(g)) => {
            for i in 0..w.len().max(g.len()) {
                segments.push(format!("[{i}]"));
                match (w.get(i), g.get(i)) {
                    (Some(wv), Some(gv)) => walk(wv, gv, options, segments, diffs),
                    (wv, gv) => {
                        if !options.ignores(segments) {
                            diffs.push(field_diff(segments, wv.cloned(), gv.cloned()));
                        }
                    }
                }
                segments.pop();
            }
        }
        (w, g) if w == g => {}
        (w, g) => diffs.push(field_diff(segments, Some(w.clone()), Some(g.clone()))),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

fn field_diff(segments: &[String], want: Option<Value>, got: Option<Value>) -> FieldDiff {
    let mut path = String::from("$");
    for segment in segments {
        if !is_index(segment) {
            path.push('.');
        }
        path.push_str(segment);
    }
    FieldDiff { path, want, got }
}
