// ABOUTME: gifpeek SDK providing the GIF result model and provider/fetcher abstractions
// ABOUTME: Includes the Tenor and Giphy search providers, source fetching, and result filtering

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

pub mod constants;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod giphy;
pub mod tenor;
pub mod test_helpers;

pub use error::GifError;
pub use fetch::SourceFetcher;
pub use filter::{FilterOptions, filter_results};
pub use giphy::GiphyProvider;
pub use tenor::TenorProvider;

pub type Result<T> = std::result::Result<T, GifError>;

/// A single search hit as returned by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifResult {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub preview_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub width: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub height: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl GifResult {
    /// URL to use for a preview: the small rendition when the provider has one.
    pub fn preview_source(&self) -> &str {
        if self.preview_url.is_empty() {
            &self.url
        } else {
            &self.preview_url
        }
    }

    /// Title with collapsed whitespace, falling back to the id and then "untitled".
    pub fn display_title(&self) -> String {
        let title = self.title.split_whitespace().collect::<Vec<_>>().join(" ");
        if !title.is_empty() {
            return title;
        }
        let id = self.id.split_whitespace().collect::<Vec<_>>().join(" ");
        if !id.is_empty() {
            return id;
        }
        "untitled".to_string()
    }
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct SearchOptions {
    #[builder(default = constants::limits::DEFAULT_LIMIT)]
    pub limit: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Query → result list. Implementations own their own HTTP concerns.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<GifResult>>;
}

/// URL → bytes. Timeouts are the implementation's responsibility.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
