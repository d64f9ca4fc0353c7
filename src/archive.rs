//! # Txtar Archives
//!
//! A flat text bundle of named files, compatible with Go's txtar format:
//!
//! ```text
//! free-text comment
//! -- a.txt --
//! hello
//! -- dir/b.txt --
//! hi
//! ```
//!
//! Formatting always orders files by name, so the same set of files yields the
//! same bytes whatever order they were added in.

use tracing::debug;

use crate::errors::{GoldenError, GoldenResult};

const MARKER: &[u8] = b"-- ";
const MARKER_END: &[u8] = b" --";
const NEWLINE_MARKER: &[u8] = b"\n-- ";

/// One named file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    pub name: String,
    pub data: Vec<u8>,
}

impl File {
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A parsed bundle: a leading comment and an ordered list of files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    pub comment: Vec<u8>,
    pub files: Vec<File>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an archive from alternating name and data arguments.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::ArchiveArity`] for an odd number of arguments and
    /// [`GoldenError::ArchiveName`] for a name that would not parse back as is.
    pub fn from_pairs<S: AsRef<str>>(name_and_data: &[S]) -> GoldenResult<Self> {
        if name_and_data.len() % 2 != 0 {
            return Err(GoldenError::ArchiveArity {
                count: name_and_data.len(),
            });
        }
        let files = name_and_data
            .chunks_exact(2)
            .map(|pair| {
                let name = pair[0].as_ref();
                check_name(name)?;
                Ok(File::new(name, pair[1].as_ref().as_bytes()))
            })
            .collect::<GoldenResult<Vec<_>>>()?;
        Ok(Self {
            comment: Vec::new(),
            files,
        })
    }

    pub fn push(&mut self, file: File) {
        self.files.push(file);
    }

    /// Stable sort by name in byte order; duplicates keep their relative order.
    pub fn sort(&mut self) {
        self.files.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
    }

    // =====================
    // Parsing
    // =====================

    /// Parses bundle text.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::ArchiveSyntax`] when a marker names an invalid
    /// path (absolute, empty elements, `.`/`..`, backslashes).
    pub fn parse(data: &[u8]) -> GoldenResult<Self> {
        let mut archive = Archive::new();
        let (comment, mut next) = find_marker(data, 0);
        archive.comment = trailing_fixed(comment, next.is_none());

        while let Some(marker) = next {
            validate_name(&marker.name, marker.line)?;
            let (body, following) = find_marker(marker.rest, marker.line);
            archive.files.push(File {
                name: marker.name,
                data: trailing_fixed(body, following.is_none()),
            });
            next = following;
        }
        debug!(files = archive.files.len(), "parsed archive");
        Ok(archive)
    }

    // =====================
    // Formatting
    // =====================

    /// Serializes the archive with files ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::ArchiveName`] when a file name would not parse
    /// back unchanged.
    pub fn format(&self) -> GoldenResult<Vec<u8>> {
        for file in &self.files {
            check_name(&file.name)?;
        }
        let mut sorted: Vec<&File> = self.files.iter().collect();
        sorted.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        let mut out = Vec::new();
        push_fixed(&mut out, &self.comment);
        for file in sorted {
            out.extend_from_slice(MARKER);
            out.extend_from_slice(file.name.as_bytes());
            out.extend_from_slice(MARKER_END);
            out.push(b'\n');
            push_fixed(&mut out, &file.data);
        }
        Ok(out)
    }

    /// Formats the archive as text.
    ///
    /// # Errors
    ///
    /// Fails like [`Archive::format`], and with [`GoldenError::NonUtf8`] when a
    /// file holds binary data.
    pub fn to_text(&self) -> GoldenResult<String> {
        String::from_utf8(self.format()?).map_err(|_| GoldenError::NonUtf8 {
            what: "archive content".to_string(),
        })
    }
}

/// Formats an archive built from name/data pairs (Go's `TxtarWith`).
///
/// # Errors
///
/// Fails like [`Archive::from_pairs`].
pub fn txtar_with<S: AsRef<str>>(name_and_data: &[S]) -> GoldenResult<String> {
    Archive::from_pairs(name_and_data)?.to_text()
}

/// Merges bundles into one.
///
/// Comments are concatenated in input order, files are concatenated in input
/// order (duplicates survive) and the result is formatted, which sorts it.
///
/// # Errors
///
/// Fails when an input is not a valid bundle.
pub fn join<S: AsRef<str>>(bundles: &[S]) -> GoldenResult<String> {
    let mut joined = Archive::new();
    for bundle in bundles {
        let archive = Archive::parse(bundle.as_ref().as_bytes())?;
        push_fixed(&mut joined.comment, &archive.comment);
        joined.files.extend(archive.files);
    }
    debug!(inputs = bundles.len(), files = joined.files.len(), "joined archives");
    joined.to_text()
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

struct Marker<'a> {
    name: String,
    rest: &'a [u8],
    line: usize,
}

/// Finds the next marker line at or after a line start in `data`.
///
/// Returns the bytes before it and the marker. Without a marker, all of
/// `data` is returned. `line` is the 1-based line number of `data[0]` minus one.
fn find_marker(data: &[u8], line: usize) -> (&[u8], Option<Marker<'_>>) {
    let mut i = 0;
    let mut current = line + 1;
    loop {
        if let Some((name, rest)) = is_marker(&data[i..]) {
            let marker = Marker {
                name,
                rest,
                line: current,
            };
            return (&data[..i], Some(marker));
        }
        match find(&data[i..], NEWLINE_MARKER) {
            Some(j) => {
                current += data[i..i + j + 1].iter().filter(|&&b| b == b'\n').count();
                i += j + 1;
            }
            None => return (data, None),
        }
    }
}

fn is_marker(data: &[u8]) -> Option<(String, &[u8])> {
    if !data.starts_with(MARKER) {
        return None;
    }
    let (line, rest) = match data.iter().position(|&b| b == b'\n') {
        Some(i) => (&data[..i], &data[i + 1..]),
        None => (data, &data[data.len()..]),
    };
    if !line.ends_with(MARKER_END) || line.len() < MARKER.len() + MARKER_END.len() {
        return None;
    }
    let inner = &line[MARKER.len()..line.len() - MARKER_END.len()];
    let name = String::from_utf8_lossy(inner).trim().to_string();
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Appends `data`, adding a final newline when it is non-empty and lacks one.
fn push_fixed(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data);
    if !data.is_empty() && !data.ends_with(b"\n") {
        out.push(b'\n');
    }
}

/// The last section of a bundle is newline-terminated like every other one.
fn trailing_fixed(data: &[u8], last: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 1);
    if last {
        push_fixed(&mut out, data);
    } else {
        out.extend_from_slice(data);
    }
    out
}

fn validate_name(name: &str, line: usize) -> GoldenResult<()> {
    match name_problem(name) {
        Some(reason) => Err(GoldenError::syntax(
            line,
            format!("file name {name:?} {reason}"),
        )),
        None => Ok(()),
    }
}

fn check_name(name: &str) -> GoldenResult<()> {
    match name_problem(name) {
        Some(reason) => Err(GoldenError::ArchiveName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Names must survive a marker line unchanged and stay inside the archive root.
fn name_problem(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        return Some("is empty");
    }
    if name.trim() != name {
        return Some("has leading or trailing whitespace");
    }
    if name.contains(['\n', '\r']) {
        return Some("spans more than one line");
    }
    if name.contains('\\') {
        return Some("must use '/' separators");
    }
    if name.starts_with('/') {
        return Some("must be relative");
    }
    if name
        .split('/')
        .any(|elem| elem.is_empty() || elem == "." || elem == "..")
    {
        return Some("has an empty, '.' or '..' element");
    }
    None
}
