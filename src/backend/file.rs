//! File backend
//!
//! One file per key inside a single directory.
//!
//! ## File Naming
//! Keys are flattened into file names by escaping every byte outside
//! `[A-Za-z0-9._-]` as `%XX`:
//! "notes/today__42" → "notes%2Ftoday__42"
//!
//! Writes go to `<name>.tmp` first and are renamed into place, so a crash
//! never leaves a half-written value under a real key.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::error::{KvError, Result};

use super::Backend;

/// Suffix of in-flight writes
const TMP_SUFFIX: &str = ".tmp";

/// Backend storing each key as a file in `root`
#[derive(Debug, Clone)]
pub struct FileBackend {
    root: PathBuf,
}

impl FileBackend {
    /// Open or create a file backend rooted at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the key files
    pub fn root(&self) -> &Path {
        &self.root
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// File path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(escape_file_name(key))
    }

    /// Map a missing file to `KeyNotFound`, everything else to `Io`
    fn not_found(key: &str, err: std::io::Error) -> KvError {
        if err.kind() == ErrorKind::NotFound {
            KvError::KeyNotFound(key.to_string())
        } else {
            KvError::Io(err)
        }
    }
}

impl Backend for FileBackend {
    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(TMP_SUFFIX);

        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn read(&self, key: &str) -> Result<String> {
        fs::read_to_string(self.key_path(key)).map_err(|e| Self::not_found(key, e))
    }

    fn read_creation_time(&self, key: &str) -> Result<DateTime<Utc>> {
        let metadata = fs::metadata(self.key_path(key)).map_err(|e| Self::not_found(key, e))?;

        // Not every platform/filesystem records a birth time
        let time = match metadata.created() {
            Ok(created) => created,
            Err(_) => metadata.modified()?,
        };
        Ok(DateTime::<Utc>::from(time))
    }

    fn delete(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!("Ignoring non UTF-8 file {:?}", file_name);
                continue;
            };
            if name.ends_with(TMP_SUFFIX) {
                continue;
            }

            match unescape_file_name(name) {
                Some(key) => keys.push(key),
                None => tracing::debug!("Ignoring foreign file {:?}", name),
            }
        }

        Ok(keys)
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// Flatten a key into a portable file name
fn escape_file_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverse `escape_file_name`; `None` for names it could not have produced
fn unescape_file_name(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] == b'%' {
            let hex = name.get(pos + 1..pos + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            out.push(u8::from_str_radix(hex, 16).ok()?);
            pos += 3;
        } else {
            out.push(bytes[pos]);
            pos += 1;
        }
    }

    String::from_utf8(out).ok()
}
