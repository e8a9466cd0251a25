use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::{Result, StorageError};

/// Durable store for raw fetched pages, one entry per resource key.
///
/// Entries are written at most once per key for the lifetime of the store
/// directory and never expire; callers check `exists` before `read`.
pub trait PageStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    /// Fails with `StorageError::CacheMiss` if no entry exists for `key`.
    fn read(&self, key: &str) -> Result<Vec<u8>>;

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Flat directory of files, filename = resource key, content = raw bytes.
pub struct FsPageStore {
    dir: PathBuf,
}

impl FsPageStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

impl PageStore for FsPageStore {
    fn exists(&self, key: &str) -> bool {
        self.entry_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Err(StorageError::CacheMiss(key.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.entry_path(key)?;
        fs::write(path, bytes)?;
        debug!("stored {} bytes under page key {}", bytes.len(), key);
        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryPageStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageStore for MemoryPageStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }

    fn read(&self, key: &str) -> Result<Vec<u8>> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::CacheMiss(key.to_string()))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_store_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsPageStore::open(tmp.path().join("pages")).unwrap();

        assert!(!store.exists("top100.html"));
        store.write("top100.html", b"<html>chart</html>").unwrap();
        assert!(store.exists("top100.html"));
        assert_eq!(store.read("top100.html").unwrap(), b"<html>chart</html>");
    }

    #[test]
    fn test_read_missing_entry_is_cache_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsPageStore::open(tmp.path()).unwrap();

        match store.read("absent.html") {
            Err(StorageError::CacheMiss(key)) => assert_eq!(key, "absent.html"),
            other => panic!("expected cache miss, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_empty_key_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FsPageStore::open(tmp.path()).unwrap();

        assert!(matches!(store.write("", b"x"), Err(StorageError::InvalidKey(_))));
        assert!(!store.exists(""));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPageStore::new();
        store.write("song.html", b"verse").unwrap();
        assert!(store.exists("song.html"));
        assert_eq!(store.read("song.html").unwrap(), b"verse");
        assert!(matches!(store.read("other.html"), Err(StorageError::CacheMiss(_))));
    }
}
