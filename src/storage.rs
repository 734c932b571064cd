use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use serde_json::Value;
use thiserror::Error;
use crate::models::Task;

/// Slot holding the JSON array of tasks.
pub const TASKS_KEY: &str = "tasks";
/// Slot holding the dark-mode display preference as `"true"` / `"false"`.
pub const DARK_MODE_KEY: &str = "darkMode";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A named-slot string store, the backing for everything the app persists.
pub trait KeyValueStore {
    /// Returns the value in `key`, or `None` if the slot was never written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replaces the whole value in `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Empties `key`. Removing a missing slot is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Stores each slot as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<FileStore, StorageError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| StorageError::Io { path: dir.clone(), source })?;
        }
        Ok(FileStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let io_err = |source| StorageError::Io { path: path.clone(), source };
        let mut f = OpenOptions::new().read(true).open(&path).map_err(io_err)?;
        let mut s = String::new();
        f.read_to_string(&mut s).map_err(io_err)?;
        Ok(Some(s))
    }

    /// Writes `<key>.json.tmp` and renames it over the slot, so a crash
    /// mid-write never leaves a truncated slot behind.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        let tmp = path.with_extension("json.tmp");
        let tmp_err = |source| StorageError::Io { path: tmp.clone(), source };
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)
            .map_err(tmp_err)?;
        f.write_all(value.as_bytes()).map_err(tmp_err)?;
        f.sync_all().map_err(tmp_err)?;
        drop(f);
        fs::rename(&tmp, &path).map_err(|source| StorageError::Io { path, source })?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|source| StorageError::Io { path, source })?;
        }
        Ok(())
    }
}

/// Keeps slots in memory. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Seeds a slot directly, bypassing the task encoder.
    pub fn with_slot(mut self, key: &str, value: &str) -> MemoryStore {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Loads all tasks from the tasks slot.
///
/// Returns an empty vector if the slot is missing, unreadable or not a JSON
/// array. Records that fail to decode are skipped; the rest are kept.
pub fn load_tasks(store: &impl KeyValueStore) -> Vec<Task> {
    let raw = match store.get(TASKS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "could not read tasks, starting empty");
            return Vec::new();
        }
    };
    let records: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(error = %e, "malformed task data, starting empty");
            return Vec::new();
        }
    };
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(task) => Some(task),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping undecodable task record");
                None
            }
        })
        .collect()
}

/// Saves the given list of tasks, overwriting the whole slot.
pub fn save_tasks(store: &mut impl KeyValueStore, tasks: &[Task]) -> Result<(), StorageError> {
    let s = serde_json::to_string_pretty(tasks)?;
    store.set(TASKS_KEY, &s)
}

/// Reads the dark-mode preference. Anything but `"true"` means light mode.
pub fn load_dark_mode(store: &impl KeyValueStore) -> bool {
    matches!(store.get(DARK_MODE_KEY), Ok(Some(v)) if v.trim() == "true")
}

pub fn save_dark_mode(store: &mut impl KeyValueStore, dark: bool) -> Result<(), StorageError> {
    store.set(DARK_MODE_KEY, if dark { "true" } else { "false" })
}

/// Deletes the tasks and preference slots.
pub fn delete_database(store: &mut impl KeyValueStore) -> Result<(), StorageError> {
    store.remove(TASKS_KEY)?;
    store.remove(DARK_MODE_KEY)?;
    Ok(())
}
