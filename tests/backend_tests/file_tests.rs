//! Tests for FileBackend
//!
//! These tests verify:
//! - Opening creates the root directory
//! - Keys with path separators map to flat files
//! - Missing keys on read, tolerated on delete
//! - Key listing ignores foreign and in-flight files

use std::fs;

use chrono::Utc;
use pathkv::{Backend, FileBackend, KvError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_backend() -> (TempDir, FileBackend) {
    let temp_dir = TempDir::new().unwrap();
    let backend = FileBackend::open(temp_dir.path().join("data")).unwrap();
    (temp_dir, backend)
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_open_creates_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("store");

    assert!(!path.exists());
    let backend = FileBackend::open(&path).unwrap();

    assert!(path.is_dir());
    assert_eq!(backend.root(), path.as_path());
}

#[test]
fn test_write_read_with_slashes() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("docs/readme__1", "{\"a\":1}").unwrap();

    assert_eq!(backend.read("docs/readme__1").unwrap(), "{\"a\":1}");
    // One flat file, no subdirectory
    let files: Vec<_> = fs::read_dir(backend.root()).unwrap().collect();
    assert_eq!(files.len(), 1);
    assert!(!backend.root().join("docs").exists());
}

#[test]
fn test_overwrite_key() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("a__1", "1").unwrap();
    backend.write("a__1", "2").unwrap();

    assert_eq!(backend.read("a__1").unwrap(), "2");
}

#[test]
fn test_read_missing_key() {
    let (_temp, backend) = setup_temp_backend();
    assert!(matches!(backend.read("a__1"), Err(KvError::KeyNotFound(_))));
}

#[test]
fn test_delete_missing_key_is_ok() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("a__1", "1").unwrap();
    backend.delete("a__1").unwrap();
    backend.delete("a__1").unwrap();

    assert!(backend.list_keys().unwrap().is_empty());
}

#[test]
fn test_creation_time_is_recent() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("a__1", "1").unwrap();

    let created = backend.read_creation_time("a__1").unwrap();
    let age = Utc::now() - created;
    assert!(age < chrono::Duration::minutes(5));
}

#[test]
fn test_list_keys_decodes_names() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("x/y z__1", "1").unwrap();
    backend.write("plain__2", "2").unwrap();

    let mut keys = backend.list_keys().unwrap();
    keys.sort();

    assert_eq!(keys, vec!["plain__2".to_string(), "x/y z__1".to_string()]);
}

#[test]
fn test_list_keys_skips_tmp_files_and_directories() {
    let (_temp, backend) = setup_temp_backend();

    backend.write("a__1", "1").unwrap();
    fs::write(backend.root().join("b__2.tmp"), "partial").unwrap();
    fs::create_dir(backend.root().join("subdir")).unwrap();

    assert_eq!(backend.list_keys().unwrap(), vec!["a__1".to_string()]);
}
