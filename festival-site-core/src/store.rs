use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StoreError;

/// Durable string-keyed store of string values. Every call is atomic on its own;
/// read-modify-write sequences rely on the caller holding the store exclusively.
pub trait PersistentStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;

    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Reads a json value, falling back to `T::default()` when the key is absent.
pub fn load_json<T, S>(store: &S, key: &str) -> Result<T, StoreError>
where
    T: DeserializeOwned + Default,
    S: PersistentStore + ?Sized,
{
    match store.get(key)? {
        Some(value) => Ok(serde_json::from_str::<Option<T>>(&value)?.unwrap_or_default()),
        None => Ok(T::default()),
    }
}

pub fn save_json<T, S>(store: &mut S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize + ?Sized,
    S: PersistentStore + ?Sized,
{
    store.set(key, serde_json::to_string(value)?)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}

/// All keys live in one json object on disk. Each write replaces the whole file
/// through a temporary file in the same directory, so a crash never leaves a
/// half-written store behind.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        debug!("opened store {} with {} keys", path.display(), values.len());
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = NamedTempFile::new_in(directory)?;
        file.write_all(serde_json::to_string(&self.values)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path)?;
        Ok(())
    }
}

impl PersistentStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_owned(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_default() {
        let store = MemoryStore::new();
        let value: Vec<String> = load_json(&store, "festivalSearchHistory").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn json_null_loads_default() {
        let mut store = MemoryStore::new();
        store.set("feedbackMessages", "null".to_owned()).unwrap();
        let value: Vec<String> = load_json(&store, "feedbackMessages").unwrap();
        assert!(value.is_empty());
    }

    #[test]
    fn corrupt_value_is_reported() {
        let mut store = MemoryStore::new();
        store.set("festivalSearchHistory", "[\"a\"".to_owned()).unwrap();
        let result: Result<Vec<String>, _> = load_json(&store, "festivalSearchHistory");
        assert!(matches!(result, Err(StoreError::Json(_))));
    }

    #[test]
    fn file_store_survives_reopen() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        save_json(&mut store, "festivalSearchHistory", &["春节", "元宵节"]).unwrap();
        drop(store);

        let store = JsonFileStore::open(&path).unwrap();
        let history: Vec<String> = load_json(&store, "festivalSearchHistory").unwrap();
        assert_eq!(history, ["春节", "元宵节"]);
    }

    #[test]
    fn file_store_remove_persists() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("store.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("a", "1".to_owned()).unwrap();
        store.remove("a").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("a").unwrap(), None);
    }
}
