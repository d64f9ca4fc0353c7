//! # Comparison of Stored and Produced Values
//!
//! Two paths decide whether a produced value matches its golden file:
//!
//! - **Textual**: canonicalize the produced value and diff it against the stored
//!   bytes. This is what users read, so it is the final word.
//! - **Structural**: decode the stored JSON into the produced value's own type and
//!   compare trees under [`CompareOptions`]. Only a structurally *equal* outcome
//!   is returned as is; any structural difference is re-checked textually.

use serde_json::Value;
use tracing::{debug, trace};

use crate::canonical::{canonicalize, Produced, Structured};
use crate::errors::GoldenResult;
use crate::report::{text_diff, DiffReport};
use crate::structural::{self, CompareOptions, FieldDiff};

/// Result of the structural path.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralOutcome {
    Equal,
    Differs(Vec<FieldDiff>),
    /// The stored text could not be decoded as the produced type.
    Undecodable(String),
}

/// Decides between the two paths and returns the final report.
pub fn compare(
    want: &[u8],
    got: Produced<'_>,
    options: &CompareOptions,
    pretty: bool,
) -> GoldenResult<DiffReport> {
    let value = match got {
        Produced::Structured(value) if looks_structured(want) => value,
        other => {
            debug!(shape = ?other.shape(), "textual comparison");
            return textual(want, other, pretty);
        }
    };

    match structural(want, value, options) {
        StructuralOutcome::Equal => Ok(DiffReport::equal()),
        StructuralOutcome::Differs(diffs) => {
            trace!(report = %structural::render(&diffs), "structural mismatch, retrying textually");
            textual(want, Produced::Structured(value), pretty)
        }
        StructuralOutcome::Undecodable(reason) => {
            debug!(%reason, "stored value does not decode as produced type, comparing textually");
            textual(want, Produced::Structured(value), pretty)
        }
    }
}

/// Canonicalizes `got` and diffs it against `want` as opaque bytes.
pub fn textual(want: &[u8], got: Produced<'_>, pretty: bool) -> GoldenResult<DiffReport> {
    let got = canonicalize(got, pretty)?;
    Ok(text_diff(want, &got))
}

/// Decodes `want` as the produced value's type and compares the trees.
pub fn structural(
    want: &[u8],
    got: &dyn Structured,
    options: &CompareOptions,
) -> StructuralOutcome {
    let decoded: Value = match got.decode_as_self(want) {
        Ok(tree) => tree,
        Err(e) => return StructuralOutcome::Undecodable(e.to_string()),
    };
    let produced = match got.to_json() {
        Ok(tree) => tree,
        Err(e) => return StructuralOutcome::Undecodable(e.to_string()),
    };

    let diffs = structural::diff_values(&decoded, &produced, options);
    if diffs.is_empty() {
        StructuralOutcome::Equal
    } else {
        StructuralOutcome::Differs(diffs)
    }
}

/// Reports whether stored text should be treated as a JSON document.
///
/// Empty input, input whose first JSON value fails to decode, and input whose
/// first non-whitespace byte is an ASCII digit are all plain text.
pub fn looks_structured(want: &[u8]) -> bool {
    let Some(first) = want.iter().find(|b| !b.is_ascii_whitespace()) else {
        return false;
    };
    if first.is_ascii_digit() {
        return false;
    }

    let mut stream = serde_json::Deserializer::from_slice(want).into_iter::<serde::de::IgnoredAny>();
    matches!(stream.next(), Some(Ok(_)))
}
