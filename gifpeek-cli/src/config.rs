// ABOUTME: Configuration file loading, validation, and hierarchical merging for gifpeek
// ABOUTME: Supports TOML config files with XDG Base Directory specification compliance

use crate::image_protocols::ThumbsMode;
use crate::output::ListingFormat;
use crate::providers::{ApiKeys, SearchSource};
use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Valid range for the cell aspect ratio, exclusive at both ends.
const CELL_ASPECT_RANGE: (f64, f64) = (0.1, 2.0);

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub thumbs: Option<ThumbsMode>,
    #[serde(default)]
    pub format: Option<ListingFormat>,
    #[serde(default)]
    pub cell_aspect: Option<f64>,
    #[serde(default)]
    pub software_animation: Option<bool>,
    #[serde(default)]
    pub source: Option<SearchSource>,
    #[serde(default)]
    pub tenor_api_key: Option<String>,
    #[serde(default)]
    pub giphy_api_key: Option<String>,
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from standard XDG-compliant locations
    pub fn load() -> Result<Self> {
        let paths = Self::get_config_paths();
        Self::load_from_paths(&paths)
    }

    /// Load configuration from file paths, lowest precedence first. Missing files are skipped.
    pub fn load_from_paths<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            let path = path.as_ref();
            if !path.is_file() {
                continue;
            }
            log::debug!("loading config from {}", path.display());
            config = config.merge(Self::load_from_file(path)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).with_context(|| {
            format!(
                "Failed to parse TOML config file: {}",
                path.as_ref().display()
            )
        })?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        Ok(config)
    }

    /// Get standard config file paths in order of precedence (lowest first)
    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. User config directory fallback
        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config").join("gifpeek").join("config.toml"));
        }

        // 2. XDG config home
        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(config_home).join("gifpeek").join("config.toml"));
        }

        // 3. Project-specific config (highest precedence)
        if let Ok(current_dir) = std::env::current_dir() {
            paths.push(current_dir.join("gifpeek.toml"));
        }

        paths
    }

    /// Merge this config with another, giving precedence to the other config
    pub fn merge(self, other: Config) -> Config {
        Config {
            limit: other.limit.or(self.limit),
            thumbs: other.thumbs.or(self.thumbs),
            format: other.format.or(self.format),
            cell_aspect: other.cell_aspect.or(self.cell_aspect),
            software_animation: other.software_animation.or(self.software_animation),
            source: other.source.or(self.source),
            tenor_api_key: other.tenor_api_key.or(self.tenor_api_key),
            giphy_api_key: other.giphy_api_key.or(self.giphy_api_key),
            download_dir: other.download_dir.or(self.download_dir),
        }
    }

    /// Keys as configured, before environment overrides.
    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys {
            tenor: self.tenor_api_key.clone(),
            giphy: self.giphy_api_key.clone(),
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.limit {
            if !(1..=50).contains(&limit) {
                return Err(anyhow!("Invalid limit {}. Must be between 1 and 50", limit));
            }
        }

        if let Some(aspect) = self.cell_aspect {
            let (min, max) = CELL_ASPECT_RANGE;
            if !(aspect > min && aspect < max) {
                return Err(anyhow!(
                    "Invalid cell_aspect {}. Must be between {} and {} (exclusive)",
                    aspect,
                    min,
                    max
                ));
            }
        }

        for (name, key) in [
            ("tenor_api_key", &self.tenor_api_key),
            ("giphy_api_key", &self.giphy_api_key),
        ] {
            if key.as_deref().is_some_and(|key| key.trim().is_empty()) {
                return Err(anyhow!("{} must not be empty", name));
            }
        }

        if self
            .download_dir
            .as_deref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(anyhow!("download_dir must not be empty"));
        }

        Ok(())
    }
}
