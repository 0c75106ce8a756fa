//! Durable key-value substrate for the local snapshot backend.
//!
//! A snapshot is one text blob under one key. Writes always replace the whole
//! blob; there is no partial or field-level write.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Keyed blob storage.
pub trait SnapshotStorage: Send + Sync {
    /// Returns the blob stored under `key`, or `None` if nothing is stored.
    fn read(&self, key: &str) -> io::Result<Option<String>>;

    /// Replaces the blob stored under `key`.
    fn write(&self, key: &str, contents: &str) -> io::Result<()>;
}

/// Stores each key as `<key>.json` inside a directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a crash never leaves a half-written snapshot behind.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `directory`. The directory is created on first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The directory snapshots are written to.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// The file that holds `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", sanitize_key(key)))
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.directory)?;
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &target)
    }
}

/// In-process storage, for tests and client-only use.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with `contents` under `key`.
    pub fn with_entry(key: impl Into<String>, contents: impl Into<String>) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), contents.into());
        storage
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
