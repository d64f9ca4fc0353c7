//! One-shot API Tests
//!
//! `golden::update` followed by `golden::diff`, plus stale-file cleanup.

use std::fs;
use std::io::Cursor;

use golden::{BoxError, MarshalText, Produced};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
struct Greeting {
    #[serde(rename = "S")]
    s: String,
}

struct Marshaler(&'static str);

impl MarshalText for Marshaler {
    fn marshal_text(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.0.as_bytes().to_vec())
    }
}

fn update_then_diff(name: &str, want: &str, got: Produced<'_>) -> bool {
    let dir = tempfile::tempdir().unwrap();
    golden::update(dir.path(), name, want).unwrap();
    !golden::diff(dir.path(), name, got).unwrap().is_equal()
}

#[cfg(test)]
mod diff_tests {
    use super::*;

    #[test]
    fn test_matching_values() {
        let greeting = Greeting { s: "hello".into() };
        let marshaler = Marshaler("hello");
        let cases: Vec<(&str, &str, Produced<'_>)> = vec![
            ("string", "hello", "hello".into()),
            ("bytes", "hello", b"hello".into()),
            ("reader", "hello", Produced::reader(Cursor::new("hello"))),
            ("json", "{\"S\":\"hello\"}\n", Produced::structured(&greeting)),
            ("marshaler", "hello", Produced::marshal(&marshaler)),
            ("empty", "", "".into()),
            ("number", "3", "3".into()),
            ("number-start", "3 bytes", "3 bytes".into()),
        ];
        for (name, want, got) in cases {
            assert!(!update_then_diff(name, want, got), "{name}: unexpected diff");
        }
    }

    #[test]
    fn test_differing_values() {
        let greeting = Greeting { s: "hello".into() };
        let marshaler = Marshaler("hello");
        let cases: Vec<(&str, &str, Produced<'_>)> = vec![
            ("string", "Hello", "hello".into()),
            ("bytes", "Hello", b"hello".into()),
            ("reader", "Hello", Produced::reader(Cursor::new("hello"))),
            ("json", "{\"S\":\"Hello\"}\n", Produced::structured(&greeting)),
            ("marshaler", "Hello", Produced::marshal(&marshaler)),
            ("number", "3", "4".into()),
            ("number-start", "3 bytes", "4 bytes".into()),
        ];
        for (name, want, got) in cases {
            assert!(update_then_diff(name, want, got), "{name}: expected a diff");
        }
    }

    #[test]
    fn test_check_without_suffix() {
        let dir = tempfile::tempdir().unwrap();
        assert!(golden::check(true, dir.path(), "plain", "value")
            .unwrap()
            .is_equal());
        assert!(dir.path().join("plain.golden").is_file());
        assert!(golden::check(false, dir.path(), "plain", "value")
            .unwrap()
            .is_equal());
    }
}

#[cfg(test)]
mod remove_all_tests {
    use super::*;

    #[test]
    fn test_removes_only_golden_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("deeper");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("a.golden"), "a").unwrap();
        fs::write(nested.join("b.golden"), "b").unwrap();
        fs::write(nested.join("keep.txt"), "keep").unwrap();
        fs::write(dir.path().join("golden"), "no extension").unwrap();
        fs::write(dir.path().join("c.golden.bak"), "backup").unwrap();

        let removed = golden::remove_all(dir.path()).unwrap();
        assert_eq!(removed, 2);
        assert!(!dir.path().join("a.golden").exists());
        assert!(!nested.join("b.golden").exists());
        assert!(nested.join("keep.txt").exists());
        assert!(dir.path().join("golden").exists());
        assert!(dir.path().join("c.golden.bak").exists());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(golden::remove_all(dir.path().join("absent")).is_err());
    }
}
