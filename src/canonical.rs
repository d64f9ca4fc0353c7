//! # Canonicalization of Produced Values
//!
//! Reduces any value handed to a check into the bytes that are persisted in, and
//! compared against, a golden file.
//!
//! ## Dispatch Order
//!
//! 1. **Bytes**: returned unchanged.
//! 2. **Reader**: drained fully; a read failure is fatal.
//! 3. **Text**: UTF-8 bytes of the string.
//! 4. **Marshal**: the value's own [`MarshalText`] output, verbatim.
//! 5. **Structured**: JSON through [`serde_json::Value`], plus a trailing newline.
//!
//! A string that happens to look like JSON is still text: only the `Structured`
//! arm is ever encoded.

use std::borrow::Cow;
use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{BoxError, GoldenError, GoldenResult};

// ============================================================================
// CAPABILITIES
// ============================================================================

/// A type that knows how to render itself as text for a golden file.
pub trait MarshalText {
    fn marshal_text(&self) -> Result<Vec<u8>, BoxError>;
}

/// Object-safe view of a serde value, used for the structured arm.
///
/// Implemented for every `T: Serialize + DeserializeOwned`.
pub trait Structured {
    /// Encodes the value as a JSON tree.
    fn to_json(&self) -> Result<Value, serde_json::Error>;

    /// Decodes the first JSON document in `want` as this value's own type and
    /// returns it as a JSON tree. Trailing content after the document is ignored.
    fn decode_as_self(&self, want: &[u8]) -> Result<Value, serde_json::Error>;
}

impl<T> Structured for T
where
    T: Serialize + DeserializeOwned,
{
    fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    fn decode_as_self(&self, want: &[u8]) -> Result<Value, serde_json::Error> {
        let mut de = serde_json::Deserializer::from_slice(want);
        let decoded = <T as Deserialize>::deserialize(&mut de)?;
        serde_json::to_value(&decoded)
    }
}

// ============================================================================
// PRODUCED VALUE
// ============================================================================

/// A value produced by the code under test, tagged by shape.
pub enum Produced<'a> {
    Bytes(Cow<'a, [u8]>),
    Reader(Box<dyn Read + 'a>),
    Text(Cow<'a, str>),
    Marshal(&'a dyn MarshalText),
    Structured(&'a dyn Structured),
}

/// Shape of a [`Produced`] value, mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Bytes,
    Reader,
    Text,
    Marshal,
    Structured,
}

impl<'a> Produced<'a> {
    pub fn reader<R: Read + 'a>(reader: R) -> Self {
        Produced::Reader(Box::new(reader))
    }

    pub fn marshal<M: MarshalText>(value: &'a M) -> Self {
        Produced::Marshal(value)
    }

    /// Wraps any serde value; it is stored as JSON and compared structurally.
    pub fn structured<T: Serialize + DeserializeOwned>(value: &'a T) -> Self {
        Produced::Structured(value)
    }

    pub fn shape(&self) -> Shape {
        match self {
            Produced::Bytes(_) => Shape::Bytes,
            Produced::Reader(_) => Shape::Reader,
            Produced::Text(_) => Shape::Text,
            Produced::Marshal(_) => Shape::Marshal,
            Produced::Structured(_) => Shape::Structured,
        }
    }

    pub fn is_bytes(&self) -> bool {
        matches!(self, Produced::Bytes(_))
    }
}

impl std::fmt::Debug for Produced<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Produced").field(&self.shape()).finish()
    }
}

impl<'a> From<&'a str> for Produced<'a> {
    fn from(value: &'a str) -> Self {
        Produced::Text(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a String> for Produced<'a> {
    fn from(value: &'a String) -> Self {
        Produced::Text(Cow::Borrowed(value.as_str()))
    }
}

impl From<String> for Produced<'_> {
    fn from(value: String) -> Self {
        Produced::Text(Cow::Owned(value))
    }
}

impl<'a> From<&'a [u8]> for Produced<'a> {
    fn from(value: &'a [u8]) -> Self {
        Produced::Bytes(Cow::Borrowed(value))
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Produced<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Produced::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl<'a> From<&'a Vec<u8>> for Produced<'a> {
    fn from(value: &'a Vec<u8>) -> Self {
        Produced::Bytes(Cow::Borrowed(value.as_slice()))
    }
}

impl From<Vec<u8>> for Produced<'_> {
    fn from(value: Vec<u8>) -> Self {
        Produced::Bytes(Cow::Owned(value))
    }
}

// ============================================================================
// CANONICALIZATION
// ============================================================================

/// Reduces `value` to its canonical bytes.
pub fn canonicalize(value: Produced<'_>, pretty: bool) -> GoldenResult<Vec<u8>> {
    match value {
        Produced::Bytes(bytes) => Ok(bytes.into_owned()),
        Produced::Reader(mut reader) => {
            let mut buf = Vec::new();
            reader
                .read_to_end(&mut buf)
                .map_err(|source| GoldenError::Drain { source })?;
            Ok(buf)
        }
        Produced::Text(text) => Ok(text.into_owned().into_bytes()),
        Produced::Marshal(value) => value
            .marshal_text()
            .map_err(|source| GoldenError::Marshal { source }),
        Produced::Structured(value) => encode_structured(value, pretty),
    }
}

/// Encodes a structured value as canonical JSON.
///
/// Going through [`Value`] sorts object keys, so hash maps encode the same way
/// on every run.
pub fn encode_structured(value: &dyn Structured, pretty: bool) -> GoldenResult<Vec<u8>> {
    let tree = value
        .to_json()
        .map_err(|source| GoldenError::Encode { source })?;
    let mut buf = if pretty {
        serde_json::to_vec_pretty(&tree)
    } else {
        serde_json::to_vec(&tree)
    }
    .map_err(|source| GoldenError::Encode { source })?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Record {
        name: String,
        count: u32,
    }

    struct Upper(&'static str);

    impl MarshalText for Upper {
        fn marshal_text(&self) -> Result<Vec<u8>, BoxError> {
            Ok(self.0.to_uppercase().into_bytes())
        }
    }

    struct Broken;

    impl MarshalText for Broken {
        fn marshal_text(&self) -> Result<Vec<u8>, BoxError> {
            Err("cannot render".into())
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }
    }

    #[test]
    fn bytes_and_text_are_verbatim() {
        assert_eq!(canonicalize(b"\x00\xffraw".into(), false).unwrap(), b"\x00\xffraw");
        assert_eq!(canonicalize("42".into(), true).unwrap(), b"42");
    }

    #[test]
    fn reader_is_drained() {
        let value = Produced::reader(io::Cursor::new("streamed"));
        assert_eq!(canonicalize(value, false).unwrap(), b"streamed");
    }

    #[test]
    fn reader_failure_is_fatal() {
        let err = canonicalize(Produced::reader(FailingReader), false).unwrap_err();
        assert!(matches!(err, GoldenError::Drain { .. }));
    }

    #[test]
    fn marshal_output_is_used() {
        let value = Upper("hello");
        assert_eq!(canonicalize(Produced::marshal(&value), false).unwrap(), b"HELLO");
        let err = canonicalize(Produced::marshal(&Broken), false).unwrap_err();
        assert!(matches!(err, GoldenError::Marshal { .. }));
    }

    #[test]
    fn structured_is_json_with_newline() {
        let record = Record {
            name: "a".into(),
            count: 2,
        };
        let out = canonicalize(Produced::structured(&record), false).unwrap();
        assert_eq!(out, b"{\"count\":2,\"name\":\"a\"}\n");

        let pretty = canonicalize(Produced::structured(&record), true).unwrap();
        assert_eq!(
            String::from_utf8(pretty).unwrap(),
            "{\n  \"count\": 2,\n  \"name\": \"a\"\n}\n"
        );
    }

    #[test]
    fn hash_maps_encode_deterministically() {
        let map: HashMap<String, u32> = (0..32).map(|i| (format!("k{i}"), i)).collect();
        let first = canonicalize(Produced::structured(&map), false).unwrap();
        let rebuilt: HashMap<String, u32> = (0..32).rev().map(|i| (format!("k{i}"), i)).collect();
        let second = canonicalize(Produced::structured(&rebuilt), false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn decode_ignores_trailing_content() {
        let record = Record {
            name: "x".into(),
            count: 0,
        };
        let tree = record
            .decode_as_self(b"{\"name\":\"y\",\"count\":7}\n trailing")
            .unwrap();
        assert_eq!(tree["count"], 7);
        assert!(record.decode_as_self(b"[1, 2]").is_err());
    }
}
