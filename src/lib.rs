//! Golden-file testing helpers.
//!
//! A test stores its expected output in `{testdata}/{name}{suffix}.golden` once
//! (update mode) and compares fresh output against it on every later run.
//! Strings, bytes, readers, [`MarshalText`] types and any serde value can be
//! checked; serde values are compared structurally first, with
//! [`CompareOptions`] to ignore fields, and always fall back to a textual diff.
//!
//! [`archive`] and [`tree`] snapshot whole directories into one txtar bundle.

use std::path::Path;

pub mod archive;
pub mod canonical;
pub mod checker;
pub mod cli;
pub mod compare;
pub mod config;
pub mod errors;
pub mod logging;
pub mod report;
pub mod store;
pub mod structural;
pub mod tree;

pub use archive::{join as txtar_join, txtar_with, Archive, File};
pub use canonical::{MarshalText, Produced, Structured};
pub use checker::Checker;
pub use config::GoldenConfig;
pub use errors::{BoxError, GoldenError, GoldenResult};
pub use report::DiffReport;
pub use structural::CompareOptions;
pub use tree::{dir_init, remove_all, snapshot_dir};

/// Compares `value` textually against `{testdata}/{name}.golden`.
///
/// # Errors
///
/// Fails when the golden file is missing or unreadable, or the value cannot be
/// canonicalized.
pub fn diff<'a>(
    testdata: impl AsRef<Path>,
    name: &str,
    value: impl Into<Produced<'a>>,
) -> GoldenResult<DiffReport> {
    let path = store::resolve_path(testdata.as_ref(), name, "");
    let want = store::read_canonical(&path)?;
    compare::textual(&want, value.into(), false)
}

/// Writes `value` to `{testdata}/{name}.golden`.
///
/// # Errors
///
/// Fails on filesystem errors or when the value cannot be canonicalized.
pub fn update<'a>(
    testdata: impl AsRef<Path>,
    name: &str,
    value: impl Into<Produced<'a>>,
) -> GoldenResult<()> {
    let path = store::resolve_path(testdata.as_ref(), name, "");
    let bytes = canonical::canonicalize(value.into(), false)?;
    store::write_canonical(&path, &bytes)
}

/// One-shot [`Checker::check`] with an empty suffix.
///
/// # Errors
///
/// See [`Checker::check`].
pub fn check<'a>(
    update: bool,
    testdata: impl AsRef<Path>,
    name: &str,
    value: impl Into<Produced<'a>>,
) -> GoldenResult<DiffReport> {
    Checker::new(update, testdata.as_ref(), name).check("", value)
}
