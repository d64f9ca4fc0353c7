//! On-disk golden records: `{testdata}/{name}{suffix}.golden`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{GoldenError, GoldenResult, IoOp};

/// File extension of every golden record.
pub const GOLDEN_EXTENSION: &str = "golden";

pub fn resolve_path(testdata: &Path, name: &str, suffix: &str) -> PathBuf {
    testdata.join(format!("{name}{suffix}.{GOLDEN_EXTENSION}"))
}

/// Reads a stored canonical form. A missing file is a setup error, never a diff.
pub fn read_canonical(path: &Path) -> GoldenResult<Vec<u8>> {
    fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => GoldenError::MissingGolden {
            path: path.to_path_buf(),
        },
        _ => GoldenError::io(IoOp::Read, path, source),
    })
}

/// Creates or truncates `path` and writes `bytes`. Parent directories are not
/// created.
pub fn write_canonical(path: &Path, bytes: &[u8]) -> GoldenResult<()> {
    let mut file = fs::File::create(path).map_err(|e| GoldenError::io(IoOp::Create, path, e))?;
    file.write_all(bytes)
        .map_err(|e| GoldenError::io(IoOp::Write, path, e))?;
    file.sync_all()
        .map_err(|e| GoldenError::io(IoOp::Write, path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "golden file written");
    Ok(())
}
