//! Dedup history: which identity keys have already been announced.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("history I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("history file is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// Per-athlete record of already-announced identity keys.
///
/// The watcher reads the full key set before change detection and writes
/// exactly one key back when a new activity is found, before the
/// notification goes out.
pub trait HistoryStore {
    fn recorded_keys(&self, athlete_id: &str) -> Result<HashSet<String>, StoreError>;
    fn record(&mut self, athlete_id: &str, key: &str) -> Result<(), StoreError>;
}

/// Non-persistent store. Every process start forgets everything, so the
/// first run announces the newest activity of every watched athlete.
#[derive(Debug, Default)]
pub struct MemoryStore {
    keys: HashMap<String, HashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn recorded_keys(&self, athlete_id: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self.keys.get(athlete_id).cloned().unwrap_or_default())
    }

    fn record(&mut self, athlete_id: &str, key: &str) -> Result<(), StoreError> {
        self.keys
            .entry(athlete_id.to_string())
            .or_default()
            .insert(key.to_string());
        Ok(())
    }
}

/// History persisted as one JSON document mapping athlete id to recorded
/// keys. Loaded once on open, rewritten in full on every insert.
///
/// Single-writer only: two concurrent runs over the same athlete can both
/// observe a key as missing and insert it twice, so schedule at most one
/// watcher per history file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    keys: HashMap<String, Vec<String>>,
}

impl JsonFileStore {
    /// Open an existing history file, or start an empty history if the
    /// file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let keys = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, keys })
    }
}

impl HistoryStore for JsonFileStore {
    fn recorded_keys(&self, athlete_id: &str) -> Result<HashSet<String>, StoreError> {
        Ok(self
            .keys
            .get(athlete_id)
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default())
    }

    fn record(&mut self, athlete_id: &str, key: &str) -> Result<(), StoreError> {
        self.keys
            .entry(athlete_id.to_string())
            .or_default()
            .push(key.to_string());
        fs::write(&self.path, serde_json::to_string_pretty(&self.keys)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("avarts-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn memory_store_round_trips_keys() {
        let mut store = MemoryStore::new();
        assert!(store.recorded_keys("123").unwrap().is_empty());

        store.record("123", "k1").unwrap();
        store.record("123", "k2").unwrap();
        store.record("456", "k1").unwrap();

        let keys = store.recorded_keys("123").unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("k1"));
        assert!(keys.contains("k2"));
        assert_eq!(store.recorded_keys("456").unwrap().len(), 1);
        assert!(store.recorded_keys("789").unwrap().is_empty());
    }

    #[test]
    fn json_file_store_persists_across_reopen() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            assert!(store.recorded_keys("123").unwrap().is_empty());
            store.record("123", "2025-01-01#Run#25:00#5.0km").unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        let keys = store.recorded_keys("123").unwrap();
        assert!(keys.contains("2025-01-01#Run#25:00#5.0km"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn json_file_store_starts_empty_without_file() {
        let path = temp_path("fresh");
        let _ = fs::remove_file(&path);

        let store = JsonFileStore::open(&path).unwrap();
        assert!(store.recorded_keys("123").unwrap().is_empty());
    }

    #[test]
    fn json_file_store_rejects_garbage_files() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Format(_)));

        let _ = fs::remove_file(&path);
    }
}
