//! Durable key/value storage for preferences.
//!
//! Backends never surface failures to callers: a denied read is an absent
//! value, a denied write is logged and dropped. The preference keeps its
//! in-memory value for the rest of the session either way.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage denied: {0}")]
    Denied(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait PreferenceStore: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Last written value for `key`, or `None` if never written or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    fn write(&self, key: &str, value: &str);

    fn clear(&self, key: &str);
}

/// In-memory backend. Clones share the same entries, so a clone handed to a
/// second broadcaster behaves like the same browser profile after a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    denied: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses every write, like a browser with storage disabled.
    #[cfg(test)]
    pub fn denied() -> Self {
        Self { denied: true, ..Self::default() }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_write(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.denied {
            return Err(StoreError::Denied("memory store is read-only".into()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Denied("entries lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl PreferenceStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn read(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.try_write(key, value) {
            debug!(backend = "memory", key, error = %err, "preference write dropped");
        }
    }

    fn clear(&self, key: &str) {
        if self.denied {
            return;
        }
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// JSON file backend: one object mapping storage keys to string values.
///
/// The file is read lazily on first access and cached; saves go through a
/// temporary file and a rename so a crash never leaves half a file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf(), cache: Mutex::new(None) }
    }

    fn load_file(&self) -> BTreeMap<String, String> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    debug!(path = %self.path.display(), error = %err, "preference file unreadable");
                }
                return BTreeMap::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "preference file corrupt, ignoring");
                BTreeMap::new()
            }
        }
    }

    fn save_file(&self, entries: &BTreeMap<String, String>) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let data = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn update(&self, key: &str, change: impl FnOnce(&mut BTreeMap<String, String>)) -> StoreResult<()> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| StoreError::Denied("cache lock poisoned".into()))?;
        let entries = cache.get_or_insert_with(|| self.load_file());
        change(entries);
        self.save_file(entries).map_err(|err| {
            debug!(path = %self.path.display(), key, error = %err, "preference save failed");
            err
        })
    }
}

impl PreferenceStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    fn read(&self, key: &str) -> Option<String> {
        let mut cache = self.cache.lock().ok()?;
        cache.get_or_insert_with(|| self.load_file()).get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        // The cached entry stays updated even when the save fails.
        let _ = self.update(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn clear(&self, key: &str) {
        let _ = self.update(key, |entries| {
            entries.remove(key);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_clones_share_entries() {
        let store = MemoryStore::new();
        let reloaded = store.clone();
        store.write("sound_muted", "false");
        assert_eq!(reloaded.read("sound_muted").as_deref(), Some("false"));
        reloaded.clear("sound_muted");
        assert!(store.read("sound_muted").is_none());
    }

    #[test]
    fn denied_memory_store_swallows_writes() {
        let store = MemoryStore::denied();
        store.write("matrix_mode", "true");
        assert!(store.read("matrix_mode").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_round_trip_across_instances() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("prefs.json");

        let store = FileStore::new(&path);
        store.write("accent_color", "purple");
        store.write("matrix_speed", "12");
        assert!(path.exists());

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read("accent_color").as_deref(), Some("purple"));
        assert_eq!(reopened.read("matrix_speed").as_deref(), Some("12"));

        reopened.clear("accent_color");
        let third = FileStore::new(&path);
        assert!(third.read("accent_color").is_none());
        assert_eq!(third.read("matrix_speed").as_deref(), Some("12"));
    }

    #[test]
    fn missing_and_corrupt_files_read_as_empty() {
        let tmp = TempDir::new().unwrap();
        let missing = FileStore::new(tmp.path().join("nope.json"));
        assert!(missing.read("font_mode").is_none());

        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let corrupt = FileStore::new(&path);
        assert!(corrupt.read("font_mode").is_none());

        corrupt.write("font_mode", "mono");
        assert_eq!(FileStore::new(&path).read("font_mode").as_deref(), Some("mono"));
    }

    #[test]
    fn unwritable_location_keeps_session_value() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "x").unwrap();
        // Parent is a regular file, so every save fails.
        let store = FileStore::new(blocker.join("prefs.json"));
        store.write("reduce_motion", "true");
        assert_eq!(store.read("reduce_motion").as_deref(), Some("true"));
    }
}
