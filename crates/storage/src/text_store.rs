use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::{Result, StorageError};

/// Suffix appended to the resource key for extracted-text entries, so the
/// extraction cache is distinguishable from the raw-page cache.
pub const TEXT_SUFFIX: &str = ".txt";

/// Durable store for extracted lyric text, keyed like `PageStore` but held
/// separately so a missing extraction is detected independently of whether
/// the raw page is cached.
///
/// An entry is the title on the first line and the body as everything after
/// the first line break. The body may itself contain line breaks; only the
/// first one splits.
pub trait TextStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;

    /// Returns `(title, body)`. Fails with `StorageError::CacheMiss` if no
    /// entry exists for `key`.
    fn read(&self, key: &str) -> Result<(String, String)>;

    fn write(&self, key: &str, title: &str, body: &str) -> Result<()>;
}

fn encode(title: &str, body: &str) -> String {
    format!("{}\n{}", title, body)
}

fn decode(entry: &str) -> (String, String) {
    match entry.split_once('\n') {
        Some((title, body)) => (title.to_string(), body.to_string()),
        None => (entry.to_string(), String::new()),
    }
}

/// Flat directory of files, filename = resource key + `TEXT_SUFFIX`.
pub struct FsTextStore {
    dir: PathBuf,
}

impl FsTextStore {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains('/') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}{}", key, TEXT_SUFFIX)))
    }
}

impl TextStore for FsTextStore {
    fn exists(&self, key: &str) -> bool {
        self.entry_path(key).map(|p| p.exists()).unwrap_or(false)
    }

    fn read(&self, key: &str) -> Result<(String, String)> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Err(StorageError::CacheMiss(key.to_string()));
        }
        Ok(decode(&fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, title: &str, body: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        fs::write(path, encode(title, body))?;
        debug!("stored extracted text under key {}", key);
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryTextStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextStore for MemoryTextStore {
    fn exists(&self, key: &str) -> bool {
        self.entries.read().unwrap().contains_key(key)
    }

    fn read(&self, key: &str) -> Result<(String, String)> {
        self.entries
            .read()
            .unwrap()
            .get(key)
            .map(|entry| decode(entry))
            .ok_or_else(|| StorageError::CacheMiss(key.to_string()))
    }

    fn write(&self, key: &str, title: &str, body: &str) -> Result<()> {
        self.entries
            .write()
            .unwrap()
            .insert(key.to_string(), encode(title, body));
        Ok(())
    }
}
