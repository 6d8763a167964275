use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::app_dirs::AppDirs;

pub const HISTORY_KEY: &str = "typing-history";
pub const SETTINGS_KEY: &str = "typing-settings";

/// Flat key/value persistence. Values are whole JSON blobs, always
/// overwritten in full.
pub trait Storage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, blob: &str) -> io::Result<()>;
}

/// One file per key under a data directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new() -> Self {
        Self {
            dir: AppDirs::data_dir(),
        }
    }

    pub fn with_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&self, key: &str, blob: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), blob)
    }
}

/// In-memory storage for tests.
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
    fail_writes: Rc<RefCell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(self, key: &str, blob: &str) -> Self {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    /// Make every subsequent `save` fail, simulating a full or read-only disk
    pub fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.borrow_mut() = fail;
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.get(key)
    }

    fn save(&self, key: &str, blob: &str) -> io::Result<()> {
        if *self.fail_writes.borrow() {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileStorage::with_dir(dir.path().join("nested"));

        assert_eq!(store.load(SETTINGS_KEY), None);
        store.save(SETTINGS_KEY, "{\"fontSize\":18}").unwrap();
        assert_eq!(
            store.load(SETTINGS_KEY).as_deref(),
            Some("{\"fontSize\":18}")
        );
        assert!(dir.path().join("nested").join("typing-settings.json").exists());
    }

    #[test]
    fn file_storage_overwrites_whole_value() {
        let dir = tempdir().unwrap();
        let store = FileStorage::with_dir(dir.path());

        store.save(HISTORY_KEY, "[1,2,3]").unwrap();
        store.save(HISTORY_KEY, "[]").unwrap();
        assert_eq!(store.load(HISTORY_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn memory_storage_clones_share_entries() {
        let store = MemoryStorage::new();
        let handle = store.clone();

        store.save(HISTORY_KEY, "[]").unwrap();
        assert_eq!(handle.get(HISTORY_KEY).as_deref(), Some("[]"));
    }

    #[test]
    fn memory_storage_can_fail_writes() {
        let store = MemoryStorage::new();
        store.set_fail_writes(true);
        assert!(store.save(HISTORY_KEY, "[]").is_err());
        assert_eq!(store.get(HISTORY_KEY), None);
    }
}
