use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::Result;

/// Base URL of the chart site.
pub const CHART_BASE_URL: &str = "http://www.metrolyrics.com/";

/// Path of the unqualified chart index.
pub const TOP100_INDEX: &str = "top100.html";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_content_size: usize,
    pub allowed_content_types: Vec<String>,
    /// Root of the on-disk caches; raw pages go to `<cache_dir>/pages`,
    /// extracted text to `<cache_dir>/text`.
    pub cache_dir: PathBuf,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; toplyrics/0.1; +https://github.com/toplyrics/toplyrics)".to_string(),
            timeout: Duration::from_secs(30),
            max_content_size: 10 * 1024 * 1024, // 10MB
            allowed_content_types: vec![
                "text/html".to_string(),
                "text/plain".to_string(),
                "application/xhtml+xml".to_string(),
            ],
            cache_dir: PathBuf::from("./lyrics"),
        }
    }
}

impl CrawlerConfig {
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn page_dir(&self) -> PathBuf {
        self.cache_dir.join("pages")
    }

    pub fn text_dir(&self) -> PathBuf {
        self.cache_dir.join("text")
    }
}

/// What to do when a song page has no heading to take a title from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedPagePolicy {
    /// Log the offending URL and continue the worklist. Default.
    Skip,
    /// Abort the whole run.
    Abort,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlOptions {
    /// Chart index pages, crawled in order. Their links form one worklist,
    /// concatenated in the same order.
    pub index_urls: Vec<Url>,
    pub on_malformed: MalformedPagePolicy,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::top100().expect("default chart index URL is valid")
    }
}

impl CrawlOptions {
    /// The plain top-100 chart, no genre qualification.
    pub fn top100() -> Result<Self> {
        Ok(Self {
            index_urls: vec![Url::parse(CHART_BASE_URL)?.join(TOP100_INDEX)?],
            on_malformed: MalformedPagePolicy::Skip,
        })
    }

    /// The plain chart followed by one genre-qualified chart per entry in
    /// `genres`, e.g. `top100-pop.html`.
    pub fn top100_with_genres<I, S>(genres: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let base = Url::parse(CHART_BASE_URL)?;
        let mut index_urls = vec![base.join(TOP100_INDEX)?];
        for genre in genres {
            index_urls.push(base.join(&format!("top100-{}.html", genre.as_ref()))?);
        }
        Ok(Self {
            index_urls,
            on_malformed: MalformedPagePolicy::Skip,
        })
    }

    pub fn with_index_urls(mut self, index_urls: Vec<Url>) -> Self {
        self.index_urls = index_urls;
        self
    }

    pub fn with_malformed_policy(mut self, policy: MalformedPagePolicy) -> Self {
        self.on_malformed = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top100_with_genres_builds_ordered_index_list() {
        let options = CrawlOptions::top100_with_genres(["pop", "rock"]).unwrap();
        let paths: Vec<&str> = options.index_urls.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/top100.html", "/top100-pop.html", "/top100-rock.html"]);
    }

    #[test]
    fn test_default_policy_is_skip() {
        assert_eq!(CrawlOptions::default().on_malformed, MalformedPagePolicy::Skip);
    }
}
