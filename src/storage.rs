//! Persistence of the workout list in a key-value store.
//!
//! The whole list is written as one JSON array under [`STORAGE_KEY`] and read
//! back wholesale. In the browser the store is `window.localStorage`.

use crate::config::STORAGE_KEY;
use crate::workout::Workout;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No storage backend could be reached.
    Unavailable,
    /// The backend refused the write (quota, privacy mode, ...).
    Write(String),
    /// The workout list could not be encoded.
    Encode(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "Local storage is not available"),
            StoreError::Write(msg) => write!(f, "Failed to write to storage: {}", msg),
            StoreError::Encode(msg) => write!(f, "Failed to encode workouts: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Minimal string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// In-memory store. Used in tests and when `localStorage` is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// `window.localStorage`.
pub struct LocalStore {
    storage: web_sys::Storage,
}

impl LocalStore {
    pub fn open() -> Result<Self, StoreError> {
        let window = web_sys::window().ok_or(StoreError::Unavailable)?;
        let storage = window
            .local_storage()
            .map_err(|_| StoreError::Unavailable)?
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!("Failed to remove '{}' from local storage: {:?}", key, e);
        }
    }
}

/// Either backend, picked at startup.
pub enum BrowserStore {
    Local(LocalStore),
    Memory(MemoryStore),
}

impl BrowserStore {
    /// `localStorage` if the browser grants it, otherwise an in-memory store
    /// that lasts for the page session.
    pub fn open() -> Self {
        match LocalStore::open() {
            Ok(store) => BrowserStore::Local(store),
            Err(e) => {
                warn!("{}; workouts will not survive a reload", e);
                BrowserStore::Memory(MemoryStore::new())
            }
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match self {
            BrowserStore::Local(s) => s.get(key),
            BrowserStore::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            BrowserStore::Local(s) => s.set(key, value),
            BrowserStore::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match self {
            BrowserStore::Local(s) => s.remove(key),
            BrowserStore::Memory(s) => s.remove(key),
        }
    }
}

/// Write the full workout list.
pub fn save_workouts<S: KeyValueStore + ?Sized>(
    store: &mut S,
    workouts: &[Workout],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(workouts).map_err(|e| StoreError::Encode(e.to_string()))?;
    store.set(STORAGE_KEY, &json)?;
    debug!("Saved {} workouts", workouts.len());
    Ok(())
}

/// Read the workout list back.
///
/// Absent or unreadable data yields an empty list. Individual records that
/// cannot be decoded, or that break the workout invariants, are skipped.
pub fn load_workouts<S: KeyValueStore + ?Sized>(store: &S) -> Vec<Workout> {
    let Some(raw) = store.get(STORAGE_KEY) else {
        return Vec::new();
    };

    let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(serde_json::Value::Array(records)) => records,
        Ok(serde_json::Value::Null) => return Vec::new(),
        Ok(other) => {
            warn!("Stored workouts are not a list (found {}), ignoring", json_kind(&other));
            return Vec::new();
        }
        Err(e) => {
            warn!("Stored workouts are not valid JSON, ignoring: {}", e);
            return Vec::new();
        }
    };

    let total = records.len();
    let workouts: Vec<Workout> = records
        .into_iter()
        .enumerate()
        .filter_map(|(idx, record)| match serde_json::from_value::<Workout>(record) {
            Ok(w) => {
                let rehydrated = w.rehydrate();
                if rehydrated.is_none() {
                    warn!("Skipping stored workout #{}: invalid values", idx);
                }
                rehydrated
            }
            Err(e) => {
                warn!("Skipping stored workout #{}: {}", idx, e);
                None
            }
        })
        .collect();

    info!("Restored {}/{} stored workouts", workouts.len(), total);
    workouts
}

/// Drop the persisted list entirely.
pub fn clear_workouts<S: KeyValueStore + ?Sized>(store: &mut S) {
    store.remove(STORAGE_KEY);
    info!("Cleared stored workouts");
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
