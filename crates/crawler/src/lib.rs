pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod extractor;
pub mod orchestrator;
pub mod parser;

pub use cache::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use extractor::*;
pub use orchestrator::*;
pub use parser::*;

/// Entry point for one crawl-and-extract pass over the chart site.
pub struct LyricsCrawler {
    config: CrawlerConfig,
}

impl LyricsCrawler {
    pub fn new() -> Self {
        Self {
            config: CrawlerConfig::default(),
        }
    }

    pub fn with_config(config: CrawlerConfig) -> Self {
        Self { config }
    }

    pub async fn crawl(&self, options: CrawlOptions) -> Result<CrawlOutcome> {
        let orchestrator = CrawlOrchestrator::new(self.config.clone(), options)?;
        orchestrator.run().await
    }
}

impl Default for LyricsCrawler {
    fn default() -> Self {
        Self::new()
    }
}
