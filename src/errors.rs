//! Golden Error Handling
//!
//! Every fatal failure a check can hit is a [`GoldenError`]. A content mismatch is
//! never an error: it is a non-empty [`crate::DiffReport`].

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Boxed error produced by a value's own text serialization.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type GoldenResult<T> = Result<T, GoldenError>;

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Filesystem operation that failed, used to label [`GoldenError::Io`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Create,
    Read,
    Write,
    CreateDir,
    Remove,
}

impl IoOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            IoOp::Create => "create",
            IoOp::Read => "read",
            IoOp::Write => "write",
            IoOp::CreateDir => "create directory",
            IoOp::Remove => "remove",
        }
    }
}

impl std::fmt::Display for IoOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for every fatal failure in golden-file handling.
#[derive(Debug, Error, Diagnostic)]
pub enum GoldenError {
    #[error("failed to {op} {}", path.display())]
    #[diagnostic(code(golden::io))]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("golden file {} does not exist", path.display())]
    #[diagnostic(
        code(golden::missing),
        help("run the test once in update mode (GOLDEN_UPDATE=1) to create it")
    )]
    MissingGolden { path: PathBuf },

    #[error("failed to drain produced reader")]
    #[diagnostic(code(golden::drain))]
    Drain {
        #[source]
        source: std::io::Error,
    },

    #[error("value failed to marshal itself to text")]
    #[diagnostic(code(golden::marshal))]
    Marshal {
        #[source]
        source: BoxError,
    },

    #[error("failed to encode value as JSON")]
    #[diagnostic(code(golden::encode))]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    #[error("archive arguments must be name/data pairs, got {count} values")]
    #[diagnostic(
        code(golden::archive::arity),
        help("pass an even number of arguments: name1, data1, name2, data2, ...")
    )]
    ArchiveArity { count: usize },

    #[error("invalid archive at line {line}: {message}")]
    #[diagnostic(code(golden::archive::syntax))]
    ArchiveSyntax { line: usize, message: String },

    #[error("invalid archive file name {name:?}: {reason}")]
    #[diagnostic(
        code(golden::archive::name),
        help("file names must be relative '/'-separated paths without '.', '..' or empty elements")
    )]
    ArchiveName { name: String, reason: &'static str },

    #[error("failed to walk directory tree")]
    #[diagnostic(code(golden::walk))]
    Walk {
        #[source]
        source: walkdir::Error,
    },

    #[error("{what} is not valid UTF-8")]
    #[diagnostic(code(golden::utf8))]
    NonUtf8 { what: String },
}

// ============================================================================
// CONSTRUCTION HELPERS
// ============================================================================

impl GoldenError {
    /// Wraps an I/O failure on `path`.
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GoldenError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        GoldenError::ArchiveSyntax {
            line,
            message: message.into(),
        }
    }

    /// True for the "golden file was never written" setup error.
    pub fn is_missing_golden(&self) -> bool {
        matches!(self, GoldenError::MissingGolden { .. })
    }
}

impl From<walkdir::Error> for GoldenError {
    fn from(source: walkdir::Error) -> Self {
        GoldenError::Walk { source }
    }
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    #[test]
    fn io_error_names_operation_and_path() {
        let err = GoldenError::io(
            IoOp::Create,
            "testdata/x.golden",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "failed to create testdata/x.golden");
    }

    #[test]
    fn missing_golden_renders_help() {
        let err = GoldenError::MissingGolden {
            path: PathBuf::from("testdata/none.golden"),
        };
        assert!(err.is_missing_golden());
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("golden::missing"));
        assert!(output.contains("update mode"));
    }

    #[test]
    fn syntax_error_carries_line() {
        let err = GoldenError::syntax(3, "bad name");
        assert_eq!(err.to_string(), "invalid archive at line 3: bad name");
    }
}
