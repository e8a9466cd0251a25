use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::{Client as ReqwestClient, Response};
use tracing::{debug, info};
use url::Url;

use crate::{CrawlerConfig, CrawlerError, Result};

/// HTTP client wrapper. One GET per page; any transport failure or
/// non-success status is fatal to the run (no retry).
#[derive(Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    max_content_size: usize,
    allowed_content_types: Vec<String>,
}

impl HttpClient {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            max_content_size: config.max_content_size,
            allowed_content_types: config.allowed_content_types.clone(),
        })
    }

    pub async fn fetch_bytes(&self, url: &Url) -> Result<Bytes> {
        debug!("fetching URL: {}", url);

        let response = self.client.get(url.as_str()).send().await?;
        let response = response.error_for_status()?;

        if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
            let content_type = content_type.to_str().unwrap_or("");
            if !self.is_allowed_content_type(content_type) {
                return Err(CrawlerError::UnsupportedContentType(content_type.to_string()));
            }
        }

        if let Some(content_length) = response.content_length() {
            if content_length > self.max_content_size as u64 {
                return Err(CrawlerError::ContentTooLarge {
                    size: content_length as usize,
                    max: self.max_content_size,
                });
            }
        }

        let bytes = self.stream_limited(response).await?;

        info!("fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes)
    }

    async fn stream_limited(&self, response: Response) -> Result<Bytes> {
        let mut bytes = BytesMut::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            if bytes.len() + chunk.len() > self.max_content_size {
                return Err(CrawlerError::ContentTooLarge {
                    size: bytes.len() + chunk.len(),
                    max: self.max_content_size,
                });
            }

            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes.freeze())
    }

    fn is_allowed_content_type(&self, content_type: &str) -> bool {
        self.allowed_content_types
            .iter()
            .any(|allowed| content_type.starts_with(allowed))
    }
}
