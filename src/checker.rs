//! # Golden Checker Sessions
//!
//! A [`Checker`] binds a testdata directory, a base name, the update flag and the
//! comparison options. It is immutable once built and can serve any number of
//! checks that share the base name.
//!
//! ```rust,no_run
//! use golden::Checker;
//!
//! let checker = Checker::new(golden::config::update_requested(), "testdata", "parse_simple");
//! let got = "parsed output";
//! let diff = checker.check("_tree", got).unwrap();
//! assert!(diff.is_equal(), "{diff}");
//! ```

use std::path::PathBuf;

use tracing::debug;

use crate::canonical::{canonicalize, Produced};
use crate::compare;
use crate::config::GoldenConfig;
use crate::errors::GoldenResult;
use crate::report::DiffReport;
use crate::store;
use crate::structural::CompareOptions;

/// Golden-file checks for one test name.
#[derive(Debug, Clone)]
pub struct Checker {
    update: bool,
    testdata: PathBuf,
    name: String,
    options: CompareOptions,
    pretty_json: bool,
}

impl Checker {
    pub fn new(update: bool, testdata: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            update,
            testdata: testdata.into(),
            name: name.into(),
            options: CompareOptions::default(),
            pretty_json: false,
        }
    }

    /// Builds a checker from environment-derived configuration.
    pub fn from_config(config: &GoldenConfig, name: impl Into<String>) -> Self {
        Self::new(config.update, config.testdata.clone(), name).pretty_json(config.pretty_json)
    }

    pub fn with_options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    /// Writes structured values as indented JSON.
    pub fn pretty_json(mut self, pretty: bool) -> Self {
        self.pretty_json = pretty;
        self
    }

    pub fn golden_path(&self, suffix: &str) -> PathBuf {
        store::resolve_path(&self.testdata, &self.name, suffix)
    }

    // =====================
    // Public API - Checks
    // =====================

    /// Checks one value against `{testdata}/{name}{suffix}.golden`.
    ///
    /// In update mode the file is rewritten and the report is always empty.
    ///
    /// # Errors
    ///
    /// Fails on any filesystem error, on a missing golden file, and when the
    /// value cannot be canonicalized. A mismatch is not an error.
    pub fn check<'a>(
        &self,
        suffix: &str,
        value: impl Into<Produced<'a>>,
    ) -> GoldenResult<DiffReport> {
        let value = value.into();
        let path = self.golden_path(suffix);

        if self.update {
            debug!(path = %path.display(), shape = ?value.shape(), "updating golden file");
            let bytes = canonicalize(value, self.pretty_json)?;
            store::write_canonical(&path, &bytes)?;
            return Ok(DiffReport::equal());
        }

        let want = store::read_canonical(&path)?;
        let report = compare::compare(&want, value, &self.options, self.pretty_json)?;
        debug!(path = %path.display(), equal = report.is_equal(), "golden check finished");
        Ok(report)
    }

    /// Checks every `(suffix, value)` entry and calls `on_diff` for each
    /// mismatch. All entries run regardless of earlier mismatches; the first
    /// fatal error stops the batch.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error raised by [`Checker::check`].
    pub fn check_all<'a, K, I, F>(&self, items: I, mut on_diff: F) -> GoldenResult<()>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, Produced<'a>)>,
        F: FnMut(&str, &DiffReport),
    {
        for (suffix, value) in items {
            let suffix = suffix.as_ref();
            let report = self.check(suffix, value)?;
            if !report.is_equal() {
                on_diff(suffix, &report);
            }
        }
        Ok(())
    }

    /// Like [`Checker::check`] but panics on a fatal error or a mismatch.
    #[track_caller]
    pub fn assert_check<'a>(&self, suffix: &str, value: impl Into<Produced<'a>>) {
        match self.check(suffix, value) {
            Ok(report) if report.is_equal() => {}
            Ok(report) => panic!(
                "golden mismatch for {}:\n{}",
                self.golden_path(suffix).display(),
                report
            ),
            Err(e) => panic!("golden check failed: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn update_then_check_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let report = Checker::new(true, dir.path(), "greeting")
            .check("_check", "hello")
            .unwrap();
        assert!(report.is_equal());
        assert_eq!(
            std::fs::read_to_string(dir.path().join("greeting_check.golden")).unwrap(),
            "hello"
        );

        let reader = Checker::new(false, dir.path(), "greeting");
        assert!(reader.check("_check", "hello").unwrap().is_equal());
        let diff = reader.check("_check", "Hello").unwrap();
        assert!(diff.as_str().contains("- hello"));
        assert!(diff.as_str().contains("+ Hello"));
    }

    #[test]
    fn missing_golden_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Checker::new(false, dir.path(), "never_written")
            .check("", "anything")
            .unwrap_err();
        assert!(err.is_missing_golden());
    }

    #[test]
    fn check_all_visits_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Checker::new(true, dir.path(), "batch");
        writer
            .check_all(
                vec![("_a", Produced::from("one")), ("_b", "two".into()), ("_c", "three".into())],
                |_, _| panic!("update mode never reports"),
            )
            .unwrap();

        let mut items: HashMap<&str, Produced<'_>> = HashMap::new();
        items.insert("_a", "one".into());
        items.insert("_b", "TWO".into());
        items.insert("_c", "THREE".into());

        let seen = RefCell::new(Vec::new());
        Checker::new(false, dir.path(), "batch")
            .check_all(items, |suffix, diff| {
                assert!(!diff.is_equal());
                seen.borrow_mut().push(suffix.to_string());
            })
            .unwrap();
        let mut seen = seen.into_inner();
        seen.sort();
        assert_eq!(seen, vec!["_b", "_c"]);
    }

    #[test]
    fn check_all_stops_on_fatal_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Checker::new(false, dir.path(), "absent")
            .check_all(vec![("_x", Produced::from("x"))], |_, _| {})
            .unwrap_err();
        assert!(err.is_missing_golden());
    }

    #[test]
    #[should_panic(expected = "golden mismatch")]
    fn assert_check_panics_on_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        Checker::new(true, dir.path(), "assert").assert_check("", "stored");
        Checker::new(false, dir.path(), "assert").assert_check("", "changed");
    }
}
