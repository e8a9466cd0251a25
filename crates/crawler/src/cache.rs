use std::sync::Arc;

use bytes::Bytes;
use storage::{resource_key, PageStore, TextStore};
use tracing::{debug, info};
use url::Url;

use crate::{HttpClient, Result};

/// Raw-page cache: fetch-or-read keyed by `resource_key`.
///
/// Existence of an entry is the sole fetch-needed predicate — there is no
/// TTL and no revalidation. An entry, once written, is never overwritten.
pub struct PageCache {
    client: Arc<HttpClient>,
    store: Arc<dyn PageStore>,
}

impl PageCache {
    pub fn new(client: Arc<HttpClient>, store: Arc<dyn PageStore>) -> Self {
        Self { client, store }
    }

    pub fn exists(&self, url: &Url) -> bool {
        self.store.exists(&resource_key(url))
    }

    /// Performs the network GET and persists the response body verbatim.
    /// Any fetch failure is fatal to the run.
    pub async fn fetch_and_store(&self, url: &Url) -> Result<()> {
        info!("fetching {}", url);
        let bytes = self.client.fetch_bytes(url).await?;
        self.store.write(&resource_key(url), &bytes)?;
        Ok(())
    }

    /// Reads the persisted entry; `StorageError::CacheMiss` if absent.
    /// Callers check `exists` first.
    pub fn read(&self, url: &Url) -> Result<Bytes> {
        Ok(Bytes::from(self.store.read(&resource_key(url))?))
    }

    /// Fetch-if-absent, then read. Never re-fetches an existing entry.
    pub async fn ensure_and_read(&self, url: &Url) -> Result<Bytes> {
        if self.exists(url) {
            debug!("cache hit for {}", url);
        } else {
            self.fetch_and_store(url).await?;
        }
        self.read(url)
    }
}

/// Extracted-text cache, separate from the raw pages so a missing
/// extraction is detectable on its own. An existing entry is never
/// recomputed, even if the raw page changes.
pub struct LyricTextCache {
    store: Arc<dyn TextStore>,
}

impl LyricTextCache {
    pub fn new(store: Arc<dyn TextStore>) -> Self {
        Self { store }
    }

    pub fn exists(&self, url: &Url) -> bool {
        self.store.exists(&resource_key(url))
    }

    pub fn write(&self, url: &Url, title: &str, body: &str) -> Result<()> {
        self.store.write(&resource_key(url), title, body)?;
        Ok(())
    }

    pub fn read(&self, url: &Url) -> Result<(String, String)> {
        Ok(self.store.read(&resource_key(url))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CrawlerConfig;
    use storage::{MemoryPageStore, MemoryTextStore};

    #[test]
    fn test_page_cache_exists_follows_store() {
        let store = Arc::new(MemoryPageStore::new());
        let client = Arc::new(HttpClient::new(&CrawlerConfig::default()).unwrap());
        let cache = PageCache::new(client, store.clone());

        let url = Url::parse("http://host/song-lyrics.html").unwrap();
        assert!(!cache.exists(&url));

        store.write("song-lyrics.html", b"<html></html>").unwrap();
        assert!(cache.exists(&url));
        assert_eq!(cache.read(&url).unwrap(), Bytes::from_static(b"<html></html>"));
    }

    #[test]
    fn test_colliding_urls_share_an_entry() {
        let store = Arc::new(MemoryPageStore::new());
        let client = Arc::new(HttpClient::new(&CrawlerConfig::default()).unwrap());
        let cache = PageCache::new(client, store.clone());

        let a = Url::parse("http://a.example/x/song.html").unwrap();
        let b = Url::parse("http://b.example/y/song.html").unwrap();
        assert!(!cache.exists(&a));
        assert!(!cache.exists(&b));

        // Basename-addressed: an entry written under one URL covers both.
        store.write("song.html", b"x").unwrap();
        assert!(cache.exists(&a));
        assert!(cache.exists(&b));
    }

    #[test]
    fn test_text_cache_round_trip() {
        let cache = LyricTextCache::new(Arc::new(MemoryTextStore::new()));
        let url = Url::parse("http://host/song-lyrics.html").unwrap();

        assert!(!cache.exists(&url));
        cache.write(&url, "Title", "line1\nline2").unwrap();
        assert!(cache.exists(&url));
        assert_eq!(cache.read(&url).unwrap(), ("Title".to_string(), "line1\nline2".to_string()));
    }
}
