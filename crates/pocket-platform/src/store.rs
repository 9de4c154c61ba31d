//! Key-value persistence for small opaque blobs.
//!
//! The session core stores its lock-screen configuration, named profiles and
//! a few device flags here as strings (mostly JSON). Nothing here interprets
//! the values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use pocket_types::error::{PocketError, Result};

/// Abstraction over a flat string-to-string store.
pub trait KeyValueStore {
    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Drop every key.
    fn clear(&mut self) -> Result<()>;

    /// All keys in sorted order.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Volatile store for tests and sessions without a backing file.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Store backed by a single JSON object on disk.
///
/// The whole map is held in memory and rewritten on every mutation, via a
/// sibling temp file and a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, loading existing entries. A missing file starts empty.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.is_file() {
            let text = std::fs::read_to_string(path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        log::debug!(
            "Opened store {} ({} entries)",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| PocketError::Store(format!("not a file path: {}", self.path.display())))?;
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.flush()
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
