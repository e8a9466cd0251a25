use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: usize, max: usize },

    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("malformed page at {url}: {reason}")]
    MalformedPage { url: Url, reason: String },
}

pub type Result<T> = std::result::Result<T, CrawlerError>;
