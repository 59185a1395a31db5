//! Durable key-value storage backends.
//!
//! - Local: one JSON file per key in the data directory
//! - Memory: in-process map for tests

use crate::error::{StoreError, StoreResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trait for key-value storage backends
pub trait StateBackend: Send + Sync {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value under `key`. Either the whole value lands or the
    /// previous one remains.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Get backend name for display
    fn backend_name(&self) -> &'static str;
}

/// Default data directory for saved state
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("futoshiki-today")
}

// ==================== Local File Backend ====================

/// File-per-key storage under a directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateBackend for FileStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(json) => Ok(Some(json)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        // rename over the old file so readers never see a partial write
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Local"
    }
}

// ==================== Memory Backend for Testing ====================

/// In-memory storage for testing
pub struct MemoryStore {
    data: Mutex<HashMap<String, String>>,
    available: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Mutex::new(HashMap::new()),
            available: Mutex::new(true),
        }
    }

    /// Make every subsequent read and write fail
    pub fn set_available(&self, available: bool) {
        *self.available.lock().unwrap_or_else(|e| e.into_inner()) = available;
    }

    /// Overwrite a raw value, bypassing serialization
    pub fn put_raw(&self, key: &str, value: &str) {
        self.data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
    }

    fn check_available(&self) -> StoreResult<()> {
        if *self.available.lock().unwrap_or_else(|e| e.into_inner()) {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store disabled".into()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateBackend for MemoryStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_available()?;
        Ok(self
            .data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        self.check_available()?;
        self.put_raw(key, value);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "Memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.read("slot").unwrap(), None);
        store.write("slot", r#"{"a":1}"#).unwrap();
        store.write("slot", r#"{"a":2}"#).unwrap();
        assert_eq!(store.read("slot").unwrap().as_deref(), Some(r#"{"a":2}"#));
        assert!(!dir.path().join("nested").join("slot.json.tmp").exists());
    }

    #[test]
    fn test_file_store_keys_are_separate_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.write("one", "1").unwrap();
        store.write("two", "2").unwrap();
        assert!(dir.path().join("one.json").exists());
        assert_eq!(store.read("two").unwrap().as_deref(), Some("2"));
        assert_eq!(store.backend_name(), "Local");
    }

    #[test]
    fn test_memory_store_unavailable() {
        let store = MemoryStore::new();
        store.write("k", "v").unwrap();
        store.set_available(false);
        assert!(store.read("k").is_err());
        assert!(store.write("k", "w").is_err());
        store.set_available(true);
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v"));
    }
}
