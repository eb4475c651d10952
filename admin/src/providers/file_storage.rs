//! JSON-file session storage.

use crate::error::{AdminError, Result};
use crate::providers::SessionStorage;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Session storage backed by a single JSON object on disk.
///
/// The whole file is rewritten on every change. A file that cannot be parsed
/// is reported as corrupted on read and replaced on the next write.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Create storage at `path`. The file and its directory are created on
    /// first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(AdminError::Storage(format!("{}: {e}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| AdminError::StorageCorrupted(format!("{}: {e}", self.path.display())))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AdminError::Storage(format!("{}: {e}", parent.display())))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| AdminError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| AdminError::Storage(format!("{}: {e}", self.path.display())))
    }

    /// Current entries for a write; a corrupted file counts as empty.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>> {
        match self.load() {
            Err(AdminError::StorageCorrupted(reason)) => {
                tracing::warn!(%reason, "Discarding unreadable session file");
                Ok(BTreeMap::new())
            },
            other => other,
        }
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.load_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.load_for_write()?;
        entries.remove(key);
        self.save(&entries)
    }
}
