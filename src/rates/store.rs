//! Durable key/value snapshot storage.
//!
//! Entries are idempotent JSON snapshots; concurrent writers to the same
//! key are last-write-wins.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Get/set by string key. Implementations must never panic on missing
/// keys; `get` returns `None` for anything unreadable.
pub trait SnapshotStore: Send + Sync {
    /// Returns the stored value for a key, if readable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value under a key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store keeping one JSON file per key.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at the given directory, creating it if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Opens the default store under the platform data directory.
    pub fn open_default() -> Result<Self> {
        let dir = dirs::data_dir()
            .context("Could not determine platform data directory")?
            .join("subsaver");
        Self::new(dir)
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are internal identifiers; replace anything path-hostile.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }

    /// Returns the directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(_) => {
                debug!("No stored value at {}", path.display());
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        std::fs::write(&path, value)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// In-memory store for tests and ephemeral setups.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries =
            self.entries.lock().map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        assert!(store.get("rates_USD").is_none());
        store.set("rates_USD", r#"{"base":"USD"}"#).unwrap();
        assert_eq!(store.get("rates_USD").unwrap(), r#"{"base":"USD"}"#);
    }

    #[test]
    fn test_file_store_overwrite() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.set("key", "first").unwrap();
        store.set("key", "second").unwrap();
        assert_eq!(store.get("key").unwrap(), "second");
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::new(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();

        store.set("rates/../evil", "v").unwrap();
        assert_eq!(store.get("rates/../evil").unwrap(), "v");
        // The raw key must not have escaped the store directory
        assert!(dir.path().join("rates____evil.json").exists());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.get("k").is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap(), "v");
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), "v2");
    }
}
