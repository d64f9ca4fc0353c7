//! Directory-tree utilities layered on golden files and archives.
//!
//! - [`remove_all`] deletes stale `.golden` files under a testdata tree.
//! - [`dir_init`] materializes a txtar bundle into a directory.
//! - [`snapshot_dir`] captures a directory as a txtar bundle.

use std::fs;
use std::path::{Component, Path};

use tracing::info;
use walkdir::WalkDir;

use crate::archive::{Archive, File};
use crate::errors::{GoldenError, GoldenResult, IoOp};
use crate::store::GOLDEN_EXTENSION;

/// Removes every regular file with the `.golden` extension under `testdata`.
///
/// Returns the number of files removed.
///
/// # Errors
///
/// Fails on the first walk or removal error.
pub fn remove_all<P: AsRef<Path>>(testdata: P) -> GoldenResult<usize> {
    let mut removed = 0;
    for entry in WalkDir::new(testdata.as_ref()) {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_golden_file(entry.path()) {
            continue;
        }
        fs::remove_file(entry.path())
            .map_err(|e| GoldenError::io(IoOp::Remove, entry.path(), e))?;
        removed += 1;
    }
    info!(root = %testdata.as_ref().display(), removed, "removed golden files");
    Ok(removed)
}

/// Creates the files of `bundle` under `root`.
///
/// Parent directories are created as needed. Zero-length entries are skipped;
/// directories are never created on their own.
///
/// # Errors
///
/// Fails on an invalid bundle or on the first filesystem error, leaving the
/// remaining entries unwritten.
pub fn dir_init<P: AsRef<Path>>(root: P, bundle: &str) -> GoldenResult<()> {
    let root = root.as_ref();
    let mut archive = Archive::parse(bundle.as_bytes())?;
    archive.sort();

    let mut written = 0usize;
    for file in &archive.files {
        if file.data.is_empty() {
            continue;
        }
        let dst = root.join(relative_path(&file.name));
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent).map_err(|e| GoldenError::io(IoOp::CreateDir, parent, e))?;
        }
        fs::write(&dst, &file.data).map_err(|e| GoldenError::io(IoOp::Write, &dst, e))?;
        written += 1;
    }
    info!(root = %root.display(), written, "initialized directory from archive");
    Ok(())
}

/// Captures every regular file under `dir` as a sorted txtar bundle.
///
/// # Errors
///
/// Fails on walk or read errors and when a file name or content is not UTF-8.
pub fn snapshot_dir<P: AsRef<Path>>(dir: P) -> GoldenResult<String> {
    let dir = dir.as_ref();
    let mut archive = Archive::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = slash_name(dir, entry.path())?;
        let data =
            fs::read(entry.path()).map_err(|e| GoldenError::io(IoOp::Read, entry.path(), e))?;
        archive.push(File::new(name, data));
    }
    archive.to_text()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn is_golden_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GOLDEN_EXTENSION)
}

fn relative_path(name: &str) -> std::path::PathBuf {
    name.split('/').collect()
}

fn slash_name(root: &Path, path: &Path) -> GoldenResult<String> {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut parts = Vec::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part.to_str().ok_or_else(|| GoldenError::NonUtf8 {
                what: format!("file name {}", path.display()),
            })?;
            parts.push(part);
        }
    }
    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::txtar_with;

    #[test]
    fn relative_path_uses_platform_separators() {
        assert_eq!(
            relative_path("dir/sub/a.txt"),
            Path::new("dir").join("sub").join("a.txt")
        );
    }

    #[test]
    fn slash_name_is_relative_to_root() {
        let root = Path::new("base");
        let path = root.join("dir").join("a.txt");
        assert_eq!(slash_name(root, &path).unwrap(), "dir/a.txt");
    }

    #[test]
    fn dir_init_skips_empty_entries() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = txtar_with(&["keep/a.txt", "hello", "skip/empty.txt", ""]).unwrap();
        dir_init(dir.path(), &bundle).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("keep").join("a.txt")).unwrap(),
            "hello\n"
        );
        assert!(!dir.path().join("skip").exists());
    }
}
