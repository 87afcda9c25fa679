// ABOUTME: Tenor v2 search provider mapping API responses into GifResult records
// ABOUTME: Requests full and tiny GIF renditions so previews stay small

use crate::constants::{limits, timeouts, urls};
use crate::{GifError, GifResult, Result, SearchOptions, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

pub struct TenorProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TenorProvider {
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, urls::TENOR_API_BASE)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeouts::SEARCH_TIMEOUT)
            .user_agent(urls::USER_AGENT)
            .build()?;
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| urls::TENOR_PUBLIC_KEY.to_string());
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TenorItem>,
}

#[derive(Debug, Deserialize)]
struct TenorItem {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content_description: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    media_formats: HashMap<String, MediaFormat>,
}

#[derive(Debug, Deserialize)]
struct MediaFormat {
    url: String,
    #[serde(default)]
    dims: Vec<u32>,
}

impl From<TenorItem> for GifResult {
    fn from(item: TenorItem) -> Self {
        let title = if item.title.trim().is_empty() {
            item.content_description
        } else {
            item.title
        };
        let full = item.media_formats.get("gif");
        let tiny = item.media_formats.get("tinygif");
        let (width, height) = full
            .and_then(|format| match format.dims.as_slice() {
                [w, h, ..] => Some((*w, *h)),
                _ => None,
            })
            .unwrap_or((0, 0));

        GifResult {
            id: item.id,
            title,
            url: full.map(|f| f.url.clone()).unwrap_or_default(),
            preview_url: tiny.map(|f| f.url.clone()).unwrap_or_default(),
            tags: item.tags,
            width,
            height,
        }
    }
}

#[async_trait]
impl SearchProvider for TenorProvider {
    fn name(&self) -> &'static str {
        "tenor"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<GifResult>> {
        let limit = options.limit.clamp(1, limits::MAX_LIMIT).to_string();
        let params = [
            ("q", query.to_string()),
            ("key", self.api_key.clone()),
            ("client_key", urls::TENOR_CLIENT_KEY.to_string()),
            ("limit", limit),
            ("media_filter", "gif,tinygif".to_string()),
        ];

        let response = self
            .client
            .get(format!("{}/v2/search", self.base_url))
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GifError::Http(status.as_u16()));
        }

        let parsed = response.json::<SearchResponse>().await?;
        log::debug!("tenor returned {} results for {:?}", parsed.results.len(), query);

        Ok(parsed
            .results
            .into_iter()
            .map(GifResult::from)
            .filter(|result| !result.url.is_empty())
            .collect())
    }
}
