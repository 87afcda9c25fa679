// ABOUTME: Giphy v1 search provider mapping API responses into GifResult records
// ABOUTME: Requires an API key; uses the original rendition plus a small preview

use crate::constants::{limits, timeouts, urls};
use crate::{GifError, GifResult, Result, SearchOptions, SearchProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// Renditions tried in order for the preview url.
const PREVIEW_RENDITIONS: &[&str] = &["fixed_width_small", "fixed_height_small", "preview_gif"];

pub struct GiphyProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GiphyProvider {
    /// Fails with `MissingApiKey` when no usable key is given; Giphy has no public key.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, urls::GIPHY_API_BASE)
    }

    pub fn with_base_url(api_key: Option<String>, base_url: &str) -> Result<Self> {
        let api_key = api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(GifError::MissingApiKey("GIPHY_API_KEY"))?;
        let client = Client::builder()
            .timeout(timeouts::SEARCH_TIMEOUT)
            .user_agent(urls::USER_AGENT)
            .build()?;
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
    data: Vec<GiphyItem>,
}

#[derive(Debug, Deserialize)]
struct GiphyItem {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    images: HashMap<String, Rendition>,
}

/// Giphy reports dimensions as decimal strings.
#[derive(Debug, Deserialize)]
struct Rendition {
    #[serde(default)]
    url: String,
    #[serde(default)]
    width: String,
    #[serde(default)]
    height: String,
}

impl From<GiphyItem> for GifResult {
    fn from(item: GiphyItem) -> Self {
        let title = if item.title.trim().is_empty() {
            item.slug.replace('-', " ")
        } else {
            item.title
        };
        let original = item.images.get("original");
        let preview = PREVIEW_RENDITIONS
            .iter()
            .filter_map(|name| item.images.get(*name))
            .find(|rendition| !rendition.url.is_empty());
        let (width, height) = original
            .map(|r| (r.width.parse().unwrap_or(0), r.height.parse().unwrap_or(0)))
            .unwrap_or((0, 0));

        GifResult {
            id: item.id,
            title,
            url: original.map(|r| r.url.clone()).unwrap_or_default(),
            preview_url: preview.map(|r| r.url.clone()).unwrap_or_default(),
            tags: Vec::new(),
            width,
            height,
        }
    }
}

#[async_trait]
impl SearchProvider for GiphyProvider {
    fn name(&self) -> &'static str {
        "giphy"
    }

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<GifResult>> {
        let limit = options.limit.clamp(1, limits::MAX_LIMIT).to_string();
        let params = [
            ("api_key", self.api_key.clone()),
            ("q", query.to_string()),
            ("limit", limit),
        ];

        let response = self
            .client
            .get(format!("{}/v1/gifs/search", self.base_url))
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GifError::Http(status.as_u16()));
        }

        let parsed = response.json::<SearchResponse>().await?;
        log::debug!("giphy returned {} results for {:?}", parsed.data.len(), query);

        Ok(parsed
            .data
            .into_iter()
            .map(GifResult::from)
            .filter(|result| !result.url.is_empty())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{giphy_search_response, mock_server};
    use mockito::Matcher;

    #[tokio::test]
    async fn test_search_maps_renditions() {
        let mut server = mock_server().await;
        let mock = server
            .mock("GET", "/v1/gifs/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "cat".into()),
                Matcher::UrlEncoded("api_key".into(), "giphy-key".into()),
                Matcher::UrlEncoded("limit".into(), "3".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(giphy_search_response().to_string())
            .create_async()
            .await;

        let provider =
            GiphyProvider::with_base_url(Some(" giphy-key ".into()), &server.url()).unwrap();
        let options = SearchOptions::builder().limit(3).build();
        let results = provider.search("cat", &options).await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Happy Cat GIF");
        assert_eq!(results[0].url, "https://media.giphy.com/media/g1/giphy.gif");
        assert_eq!(results[0].preview_url, "https://media.giphy.com/media/g1/100w.gif");
        assert_eq!((results[0].width, results[0].height), (480, 270));
        // Untitled items fall back to the slug and the next preview rendition
        assert_eq!(results[1].title, "dog wave g2");
        assert_eq!(results[1].preview_url, "https://media.giphy.com/media/g2/preview.gif");
        assert_eq!((results[1].width, results[1].height), (0, 0));
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let mut server = mock_server().await;
        let _mock = server
            .mock("GET", "/v1/gifs/search")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let provider = GiphyProvider::with_base_url(Some("bad".into()), &server.url()).unwrap();
        let err = provider
            .search("cat", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GifError::Http(401)));
    }

    #[tokio::test]
    async fn test_search_invalid_json() {
        let mut server = mock_server().await;
        let _mock = server
            .mock("GET", "/v1/gifs/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"data\": 7}")
            .create_async()
            .await;

        let provider = GiphyProvider::with_base_url(Some("key".into()), &server.url()).unwrap();
        let err = provider
            .search("cat", &SearchOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, GifError::InvalidResponse));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        for key in [None, Some(String::new()), Some("  ".to_string())] {
            assert!(matches!(
                GiphyProvider::new(key),
                Err(GifError::MissingApiKey("GIPHY_API_KEY"))
            ));
        }
    }
}
