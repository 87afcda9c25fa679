// ABOUTME: Search source selection for the CLI
// ABOUTME: Resolves API keys from env and config and builds the matching SDK provider

use crate::constants::env as env_vars;
use crate::image_protocols::detection::EnvLookup;
use gifpeek_sdk::{GifError, GiphyProvider, SearchProvider, TenorProvider};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    /// Tenor (falls back to a public key)
    #[default]
    Tenor,
    /// Giphy (requires GIPHY_API_KEY)
    Giphy,
}

/// API keys from the config file. Environment variables take precedence.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub tenor: Option<String>,
    pub giphy: Option<String>,
}

impl ApiKeys {
    pub fn resolve(env: EnvLookup<'_>, config: ApiKeys) -> Self {
        Self {
            tenor: env(env_vars::TENOR_API_KEY).or(config.tenor),
            giphy: env(env_vars::GIPHY_API_KEY).or(config.giphy),
        }
    }
}

pub fn build_provider(
    source: SearchSource,
    keys: ApiKeys,
) -> Result<Arc<dyn SearchProvider>, GifError> {
    let provider: Arc<dyn SearchProvider> = match source {
        SearchSource::Tenor => Arc::new(TenorProvider::new(keys.tenor)?),
        SearchSource::Giphy => Arc::new(GiphyProvider::new(keys.giphy)?),
    };
    log::debug!("using {} search provider", provider.name());
    Ok(provider)
}
