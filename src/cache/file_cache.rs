use crate::constants::CACHE_DIR_NAME;
use crate::domain::CacheStore;
use crate::utils::error::{Result, UnleashError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON file backed key/value cache, one file per client instance.
///
/// Writes are buffered in memory until [`CacheStore::sync`] is called.
#[derive(Debug)]
pub struct FileCache {
    entries: Map<String, Value>,
    file_path: PathBuf,
    dirty: bool,
}

impl FileCache {
    /// Opens (or starts) the cache `name` inside `directory`, falling back to the user cache
    /// directory when none is given.
    pub fn open(name: &str, directory: Option<&Path>) -> Result<Self> {
        let directory = match directory {
            Some(dir) => dir.to_path_buf(),
            None => default_cache_directory()?,
        };
        let file_path = directory.join(format!("{}.json", sanitize_name(name)));

        let entries = if file_path.exists() {
            debug!("Loading cache from {:?}", file_path);
            let content = fs::read_to_string(&file_path)?;
            match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Cache file {:?} is unreadable, starting empty: {}", file_path, e);
                    Map::new()
                }
            }
        } else {
            debug!("Cache file not found, starting with empty cache");
            Map::new()
        };

        Ok(Self {
            entries,
            file_path,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
        self.dirty = true;
    }

    fn sync(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // 先寫暫存檔再改名，避免讀到寫到一半的檔案
        let tmp_path = self.file_path.with_extension("json.tmp");
        let content = serde_json::to_string(&self.entries)?;
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.file_path)?;

        self.dirty = false;
        debug!("Saved {} cache entries to {:?}", self.entries.len(), self.file_path);
        Ok(())
    }

    fn delete(&mut self) -> Result<()> {
        self.entries.clear();
        self.dirty = false;
        if self.file_path.exists() {
            fs::remove_file(&self.file_path)?;
            debug!("Deleted cache file {:?}", self.file_path);
        }
        Ok(())
    }
}

fn default_cache_directory() -> Result<PathBuf> {
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_DIR_NAME))
        .ok_or_else(|| UnleashError::CacheError {
            message: "no cache directory available on this platform; set cache_directory"
                .to_string(),
        })
}

/// Instance ids end up in file names.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_cache_persists_after_sync() {
        let temp_dir = TempDir::new().unwrap();

        let mut cache = FileCache::open("instance-1", Some(temp_dir.path())).unwrap();
        assert!(cache.is_empty());
        cache.set("key", serde_json::json!({"a": 1}));
        cache.sync().unwrap();

        let reopened = FileCache::open("instance-1", Some(temp_dir.path())).unwrap();
        assert_eq!(reopened.get("key"), Some(serde_json::json!({"a": 1})));
    }

    #[test]
    fn test_unsynced_values_are_not_written() {
        let temp_dir = TempDir::new().unwrap();

        let mut cache = FileCache::open("instance-1", Some(temp_dir.path())).unwrap();
        cache.set("key", serde_json::json!("value"));
        assert!(!cache.path().exists());

        let reopened = FileCache::open("instance-1", Some(temp_dir.path())).unwrap();
        assert!(reopened.get("key").is_none());
    }

    #[test]
    fn test_typed_roundtrip_of_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let now = Utc::now();

        let mut cache = FileCache::open("typed", Some(temp_dir.path())).unwrap();
        cache.set_as("mlst", &now).unwrap();
        cache.sync().unwrap();

        let reopened = FileCache::open("typed", Some(temp_dir.path())).unwrap();
        let stored: DateTime<Utc> = reopened.get_as("mlst").unwrap();
        assert_eq!(stored, now);
    }

    #[test]
    fn test_delete_removes_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut cache = FileCache::open("gone", Some(temp_dir.path())).unwrap();
        cache.set("key", serde_json::json!(1));
        cache.sync().unwrap();
        assert!(cache.path().exists());

        cache.delete().unwrap();
        assert!(!cache.path().exists());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("broken.json"), "{not json").unwrap();

        let cache = FileCache::open("broken", Some(temp_dir.path())).unwrap();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_name_is_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let cache = FileCache::open("../evil/name", Some(temp_dir.path())).unwrap();
        assert_eq!(cache.path().parent().unwrap(), temp_dir.path());
    }
}
