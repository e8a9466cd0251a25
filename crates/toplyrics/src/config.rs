use std::path::PathBuf;

use anyhow::Context;
use crawler::{CrawlOptions, CrawlerConfig, MalformedPagePolicy};
use url::Url;

/// Runtime settings, environment variables over defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub cache_dir: PathBuf,
    pub user_agent: Option<String>,
    /// Genre-qualified charts to crawl after the plain top-100.
    pub genres: Vec<String>,
    /// Explicit index URL list; when set it replaces the chart defaults.
    pub index_urls: Vec<String>,
    pub on_malformed: MalformedPagePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("./lyrics"),
            user_agent: None,
            genres: Vec::new(),
            index_urls: Vec::new(),
            on_malformed: MalformedPagePolicy::Skip,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("TOPLYRICS_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }

        if let Ok(agent) = std::env::var("TOPLYRICS_USER_AGENT") {
            config.user_agent = Some(agent);
        }

        if let Ok(genres) = std::env::var("TOPLYRICS_GENRES") {
            config.genres = split_list(&genres);
        }

        if let Ok(urls) = std::env::var("TOPLYRICS_INDEX_URLS") {
            config.index_urls = split_list(&urls);
        }

        if let Ok(policy) = std::env::var("TOPLYRICS_ON_MALFORMED") {
            if policy.eq_ignore_ascii_case("abort") {
                config.on_malformed = MalformedPagePolicy::Abort;
            }
        }

        config
    }

    pub fn crawler_config(&self) -> CrawlerConfig {
        let mut config = CrawlerConfig::default().with_cache_dir(&self.cache_dir);
        if let Some(agent) = &self.user_agent {
            config = config.with_user_agent(agent.clone());
        }
        config
    }

    pub fn crawl_options(&self) -> anyhow::Result<CrawlOptions> {
        let options = if self.index_urls.is_empty() {
            CrawlOptions::top100_with_genres(&self.genres)?
        } else {
            let index_urls = self
                .index_urls
                .iter()
                .map(|raw| {
                    Url::parse(raw).with_context(|| format!("invalid index URL: {}", raw))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            CrawlOptions::default().with_index_urls(index_urls)
        };

        Ok(options.with_malformed_policy(self.on_malformed))
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(split_list("pop, rock,,jazz "), vec!["pop", "rock", "jazz"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_default_options_are_plain_chart() {
        let options = AppConfig::default().crawl_options().unwrap();
        assert_eq!(options.index_urls.len(), 1);
        assert_eq!(options.index_urls[0].path(), "/top100.html");
    }

    #[test]
    fn test_genres_expand_into_index_urls() {
        let config = AppConfig {
            genres: vec!["pop".to_string(), "rock".to_string()],
            ..Default::default()
        };
        let options = config.crawl_options().unwrap();
        let paths: Vec<&str> = options.index_urls.iter().map(|u| u.path()).collect();
        assert_eq!(paths, vec!["/top100.html", "/top100-pop.html", "/top100-rock.html"]);
    }

    #[test]
    fn test_explicit_index_urls_replace_defaults() {
        let config = AppConfig {
            index_urls: vec!["http://charts.example/top100-blues.html".to_string()],
            ..Default::default()
        };
        let options = config.crawl_options().unwrap();
        assert_eq!(options.index_urls.len(), 1);
        assert_eq!(options.index_urls[0].path(), "/top100-blues.html");
    }
}
