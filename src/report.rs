//! Diff reports and line-level textual diffing.

use std::fmt;

use difference::{Changeset, Difference};

/// Outcome of a check. Empty means the produced value matched the golden file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport(String);

impl DiffReport {
    pub fn equal() -> Self {
        Self::default()
    }

    pub fn is_equal(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DiffReport> for String {
    fn from(report: DiffReport) -> Self {
        report.0
    }
}

// ============================================================================
// TEXTUAL DIFF
// ============================================================================

/// Compares two canonical forms as opaque bytes and renders a line diff when
/// they differ.
pub fn text_diff(want: &[u8], got: &[u8]) -> DiffReport {
    if want == got {
        return DiffReport::equal();
    }

    let want_text = String::from_utf8_lossy(want);
    let got_text = String::from_utf8_lossy(got);
    if want_text == got_text {
        return DiffReport(binary_summary(want, got));
    }

    let changeset = Changeset::new(&want_text, &got_text, "\n");
    let mut out = String::from("--- want\n+++ got\n");
    for diff in &changeset.diffs {
        let (prefix, chunk) = match diff {
            Difference::Same(x) => ("  ", x),
            Difference::Rem(x) => ("- ", x),
            Difference::Add(x) => ("+ ", x),
        };
        for line in chunk.split('\n') {
            out.push_str(prefix);
            out.push_str(line);
            out.push('\n');
        }
    }
    DiffReport(out)
}

fn binary_summary(want: &[u8], got: &[u8]) -> String {
    let offset = want
        .iter()
        .zip(got)
        .position(|(w, g)| w != g)
        .unwrap_or_else(|| want.len().min(got.len()));
    format!(
        "binary content differs: want {} bytes, got {} bytes, first difference at offset {}\n",
        want.len(),
        got.len(),
        offset
    )
}
