//! Environment-driven configuration for golden checks.
//!
//! - `GOLDEN_UPDATE`: rewrite golden files instead of comparing.
//! - `GOLDEN_TESTDATA`: directory holding golden files (default `testdata`).
//! - `GOLDEN_PRETTY_JSON`: indent structured values when writing them.

use std::env;
use std::path::PathBuf;

use once_cell::sync::Lazy;

pub const UPDATE_ENV: &str = "GOLDEN_UPDATE";
pub const TESTDATA_ENV: &str = "GOLDEN_TESTDATA";
pub const PRETTY_JSON_ENV: &str = "GOLDEN_PRETTY_JSON";

pub const DEFAULT_TESTDATA: &str = "testdata";

static UPDATE_REQUESTED: Lazy<bool> = Lazy::new(|| flag_from_env(UPDATE_ENV));

/// Configuration shared by the checkers of a test binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenConfig {
    pub update: bool,
    pub testdata: PathBuf,
    pub pretty_json: bool,
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            update: false,
            testdata: PathBuf::from(DEFAULT_TESTDATA),
            pretty_json: false,
        }
    }
}

impl GoldenConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            update: lookup(UPDATE_ENV).is_some_and(|v| is_truthy(&v)),
            testdata: lookup(TESTDATA_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.testdata),
            pretty_json: lookup(PRETTY_JSON_ENV).is_some_and(|v| is_truthy(&v)),
        }
    }
}

/// Whether `GOLDEN_UPDATE` asked for golden files to be rewritten.
///
/// Read once per process.
pub fn update_requested() -> bool {
    *UPDATE_REQUESTED
}

fn flag_from_env(key: &str) -> bool {
    env::var(key).is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
