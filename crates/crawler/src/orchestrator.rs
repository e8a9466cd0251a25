use std::sync::Arc;

use storage::{FsPageStore, FsTextStore, PageStore, TextStore};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    CrawlerError, CrawlOptions, CrawlerConfig, HttpClient, IndexExtractor, LyricExtractor,
    LyricRecord, LyricTextCache, MalformedPagePolicy, PageCache, Result, SongLink,
    MISSING_LYRICS,
};

/// What one crawl pass hands to the analysis stage: the record collection in
/// link-discovery order and the concatenated corpus of every usable body.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: Vec<LyricRecord>,
    pub corpus: String,
    /// Network fetches this run actually performed (cache misses).
    pub pages_fetched: usize,
    /// Songs excluded because their lyrics are not licensed for display.
    pub skipped_missing: usize,
    /// Song pages skipped as malformed under `MalformedPagePolicy::Skip`.
    pub skipped_malformed: usize,
}

pub struct CrawlOrchestrator {
    options: CrawlOptions,
    pages: PageCache,
    texts: LyricTextCache,
    index_extractor: IndexExtractor,
    lyric_extractor: LyricExtractor,
}

impl CrawlOrchestrator {
    /// Orchestrator over the on-disk caches under `config.cache_dir`.
    pub fn new(config: CrawlerConfig, options: CrawlOptions) -> Result<Self> {
        let page_store: Arc<dyn PageStore> = Arc::new(FsPageStore::open(config.page_dir())?);
        let text_store: Arc<dyn TextStore> = Arc::new(FsTextStore::open(config.text_dir())?);
        Self::with_stores(&config, options, page_store, text_store)
    }

    /// Orchestrator over injected stores, for tests or alternative backends.
    pub fn with_stores(
        config: &CrawlerConfig,
        options: CrawlOptions,
        page_store: Arc<dyn PageStore>,
        text_store: Arc<dyn TextStore>,
    ) -> Result<Self> {
        let client = Arc::new(HttpClient::new(config)?);

        Ok(Self {
            options,
            pages: PageCache::new(client, page_store),
            texts: LyricTextCache::new(text_store),
            index_extractor: IndexExtractor::new(),
            lyric_extractor: LyricExtractor::new(),
        })
    }

    /// One full crawl pass: discover song links across the configured index
    /// pages, then fetch/extract each song in worklist order. Strictly
    /// sequential; any fetch failure aborts the run. Everything already
    /// cached is reused, so a rerun over an unchanged cache performs zero
    /// network calls.
    pub async fn run(&self) -> Result<CrawlOutcome> {
        let mut pages_fetched = 0;

        let worklist = self.discover(&mut pages_fetched).await?;
        info!(
            "discovered {} song links across {} index pages",
            worklist.len(),
            self.options.index_urls.len()
        );

        let mut records = Vec::new();
        let mut corpus = String::new();
        let mut skipped_missing = 0;
        let mut skipped_malformed = 0;

        for link in &worklist {
            self.ensure_page(&link.url, &mut pages_fetched).await?;

            if !self.texts.exists(&link.url) {
                let bytes = self.pages.read(&link.url)?;
                match self.lyric_extractor.extract(&bytes, &link.url) {
                    // Whole pair or nothing: the write happens only after
                    // extraction fully succeeded.
                    Ok(lyric) => self.texts.write(&link.url, &lyric.title, &lyric.body)?,
                    Err(err @ CrawlerError::MalformedPage { .. }) => {
                        match self.options.on_malformed {
                            MalformedPagePolicy::Skip => {
                                warn!("skipping song page: {}", err);
                                skipped_malformed += 1;
                                continue;
                            }
                            MalformedPagePolicy::Abort => return Err(err),
                        }
                    }
                    Err(err) => return Err(err),
                }
            }

            // Read back the persisted form; downstream consumes what the
            // cache holds, not the in-memory extraction result.
            let (title, body) = self.texts.read(&link.url)?;

            if body == MISSING_LYRICS {
                debug!("lyrics unavailable for {}, excluded from results", link.url);
                skipped_missing += 1;
                continue;
            }

            corpus.push_str(&body);
            records.push(LyricRecord {
                title,
                url: link.url.clone(),
                genre: link.genre.clone(),
                body,
            });
        }

        info!(
            "crawl complete: {} records, {} fetched, {} unlicensed, {} malformed",
            records.len(),
            pages_fetched,
            skipped_missing,
            skipped_malformed
        );

        Ok(CrawlOutcome {
            records,
            corpus,
            pages_fetched,
            skipped_missing,
            skipped_malformed,
        })
    }

    /// Step 1: one ordered worklist, concatenated across index pages in
    /// configured order. No cross-index de-duplication.
    async fn discover(&self, pages_fetched: &mut usize) -> Result<Vec<SongLink>> {
        let mut worklist = Vec::new();

        for index_url in &self.options.index_urls {
            self.ensure_page(index_url, pages_fetched).await?;
            let bytes = self.pages.read(index_url)?;
            worklist.extend(self.index_extractor.extract(&bytes, index_url));
        }

        Ok(worklist)
    }

    async fn ensure_page(&self, url: &Url, pages_fetched: &mut usize) -> Result<()> {
        if self.pages.exists(url) {
            debug!("cache hit for {}", url);
        } else {
            self.pages.fetch_and_store(url).await?;
            *pages_fetched += 1;
        }
        Ok(())
    }
}
