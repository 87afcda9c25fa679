// ABOUTME: Source fetcher for GIF bytes over HTTP(S), file:// URLs, and local paths
// ABOUTME: Applies a fixed timeout and user agent; non-2xx responses are errors

use crate::constants::{timeouts, urls};
use crate::{Fetcher, GifError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use url::Url;

pub struct SourceFetcher {
    client: Client,
}

impl SourceFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(timeouts::FETCH_TIMEOUT)
            .user_agent(urls::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GifError::Http(status.as_u16()));
        }
        let body = response.bytes().await?;
        log::debug!("fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Fetcher for SourceFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>> {
        match classify(source)? {
            Source::Http(url) => self.fetch_http(&url).await,
            Source::File(path) => Ok(tokio::fs::read(&path).await?),
        }
    }
}

#[derive(Debug, PartialEq)]
enum Source {
    Http(String),
    File(PathBuf),
}

fn classify(source: &str) -> Result<Source> {
    let source = source.trim();
    if source.is_empty() {
        return Err(GifError::UnsupportedSource("empty source".to_string()));
    }
    match Url::parse(source) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Source::Http(url.to_string())),
            "file" => url
                .to_file_path()
                .map(Source::File)
                .map_err(|_| GifError::UnsupportedSource(source.to_string())),
            // Windows drive letters parse as a one-letter scheme.
            scheme if scheme.len() == 1 => Ok(Source::File(PathBuf::from(source))),
            _ => Err(GifError::UnsupportedSource(source.to_string())),
        },
        Err(_) => Ok(Source::File(PathBuf::from(source))),
    }
}
