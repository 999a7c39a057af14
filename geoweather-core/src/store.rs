//! Persistent key-value storage and the API-key bridge on top of it.

use std::{
    collections::{BTreeMap, HashMap},
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use anyhow::anyhow;
use directories::ProjectDirs;

use crate::error::StoreError;

/// Storage key the API credential lives under.
pub const API_KEY_STORAGE_KEY: &str = "apiKey";

/// String-to-string storage that outlives the process, like a browser's
/// local storage.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A flat TOML table of strings on disk. Every `set_item` rewrites the file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                items: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let items = toml::from_str(&contents).map_err(|e| StoreError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { path, items })
    }

    /// Platform data directory location, e.g. `~/.local/share/geoweather/storage.toml`.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().join("storage.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let contents = toml::to_string_pretty(items).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        fs::write(&self.path, contents).map_err(write_err)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    /// The in-memory copy only changes once the file has been written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.clone();
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)?;
        self.items = items;
        Ok(())
    }
}

/// Reads and writes the API key under [`API_KEY_STORAGE_KEY`].
#[derive(Debug)]
pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
}

impl CredentialStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    pub fn write(&mut self, api_key: &str) -> Result<(), StoreError> {
        self.backend.set_item(API_KEY_STORAGE_KEY, api_key)
    }

    /// The stored key, or `None` if it was never written or is empty.
    pub fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.backend.get_item(API_KEY_STORAGE_KEY)?.filter(|k| !k.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_store_overwrites_previous_key() {
        let mut store = CredentialStore::new(Box::new(MemoryStore::new()));
        assert_eq!(store.read().unwrap(), None);

        store.write("first").unwrap();
        store.write("second").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn empty_key_reads_as_absent() {
        let mut store = CredentialStore::new(Box::new(MemoryStore::new()));
        store.write("").unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.toml");

        let mut first = FileStore::open(&path).unwrap();
        assert_eq!(first.get_item(API_KEY_STORAGE_KEY).unwrap(), None);
        first.set_item(API_KEY_STORAGE_KEY, "K123").unwrap();
        first.set_item("other", "value").unwrap();

        let second = FileStore::open(&path).unwrap();
        assert_eq!(second.get_item(API_KEY_STORAGE_KEY).unwrap().as_deref(), Some("K123"));
        assert_eq!(second.get_item("other").unwrap().as_deref(), Some("value"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("apiKey = \"K123\""));
    }

    #[test]
    fn failed_write_leaves_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");

        let mut store = FileStore::open(&path).unwrap();
        store.set_item(API_KEY_STORAGE_KEY, "old").unwrap();

        // A directory where the file should be makes every write fail.
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();

        let err = store.set_item(API_KEY_STORAGE_KEY, "new").unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
        assert_eq!(store.get_item(API_KEY_STORAGE_KEY).unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.toml");
        fs::write(&path, "this is = = not toml").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }
}
