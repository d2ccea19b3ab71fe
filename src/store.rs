//! Key-value persistence for user preferences.
//!
//! Values are JSON strings, mirroring how a browser's local storage is used.

use crate::PantryError;
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub const LAST_QUERY_KEY: &str = "tp.lastIngredient";
pub const FAVORITES_KEY: &str = "tp.favorites";
pub const HISTORY_KEY: &str = "tp.history";
pub const HAS_VISITED_KEY: &str = "tp.hasVisited";

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PantryError>;
    fn remove(&self, key: &str) -> Result<(), PantryError>;
}

/// Store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> PantryError {
    PantryError::StoreError("store lock poisoned".to_string())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PantryError> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PantryError> {
        self.entries.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object file, rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open `path`, treating a missing file as an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PantryError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    PantryError::StoreError(format!("{}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened store {} with {} keys", path.display(), entries.len());

        Ok(JsonFileStore {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a sibling temp file, then rename it over the store
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), PantryError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| PantryError::IoError(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PantryError> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PantryError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), PantryError> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

/// Typed view over a [`KeyValueStore`]: last query, favorites, history
pub struct Preferences<S: KeyValueStore> {
    store: S,
    history_limit: usize,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self::with_history_limit(store, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(store: S, history_limit: usize) -> Self {
        Preferences {
            store,
            history_limit,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Unreadable values fall back to the default rather than failing
    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, PantryError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(T::default());
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                debug!("Ignoring unreadable value for {}: {}", key, e);
                Ok(T::default())
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PantryError> {
        self.store.set(key, &serde_json::to_string(value)?)
    }

    pub fn last_query(&self) -> Result<String, PantryError> {
        self.read(LAST_QUERY_KEY)
    }

    pub fn set_last_query(&self, query: &str) -> Result<(), PantryError> {
        self.write(LAST_QUERY_KEY, query)
    }

    /// Favorite ids in sorted order
    pub fn favorites(&self) -> Result<Vec<String>, PantryError> {
        let map: BTreeMap<String, bool> = self.read(FAVORITES_KEY)?;
        Ok(map
            .into_iter()
            .filter(|(_, favorite)| *favorite)
            .map(|(id, _)| id)
            .collect())
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool, PantryError> {
        let map: BTreeMap<String, bool> = self.read(FAVORITES_KEY)?;
        Ok(map.get(id).copied().unwrap_or(false))
    }

    /// Flip `id` in the favorite set, returning whether it is now a favorite
    pub fn toggle_favorite(&self, id: &str) -> Result<bool, PantryError> {
        let mut map: BTreeMap<String, bool> = self.read(FAVORITES_KEY)?;
        let now_favorite = map.remove(id).is_none();
        if now_favorite {
            map.insert(id.to_string(), true);
        }
        self.write(FAVORITES_KEY, &map)?;
        Ok(now_favorite)
    }

    pub fn history(&self) -> Result<Vec<String>, PantryError> {
        self.read(HISTORY_KEY)
    }

    /// Move `query` to the front of the history, dropping older duplicates
    pub fn record_search(&self, query: &str) -> Result<Vec<String>, PantryError> {
        let mut history = self.history()?;
        if query.trim().is_empty() {
            return Ok(history);
        }

        history.retain(|entry| entry != query);
        history.insert(0, query.to_string());
        history.truncate(self.history_limit);
        self.write(HISTORY_KEY, &history)?;
        Ok(history)
    }

    pub fn clear_history(&self) -> Result<(), PantryError> {
        self.write::<[String]>(HISTORY_KEY, &[])
    }

    pub fn has_visited(&self) -> Result<bool, PantryError> {
        self.read(HAS_VISITED_KEY)
    }

    pub fn mark_visited(&self) -> Result<(), PantryError> {
        self.write(HAS_VISITED_KEY, &true)
    }
}
