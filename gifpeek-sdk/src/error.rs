// ABOUTME: Custom error types for the gifpeek SDK with user-friendly messages
// ABOUTME: Covers provider search, source fetching, and result filtering failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GifError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("Timeout: Request took too long to complete")]
    Timeout,

    #[error("Invalid provider response format")]
    InvalidResponse,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("Missing API key: set {0}")]
    MissingApiKey(&'static str),
}

impl GifError {
    pub fn help_text(&self) -> Option<&'static str> {
        match self {
            GifError::Network(_) => Some("Check your internet connection and try again"),
            GifError::Http(401) | GifError::Http(403) => {
                Some("Check your API key (TENOR_API_KEY / GIPHY_API_KEY or the config file)")
            }
            GifError::Http(429) => Some("Wait a moment before making another request"),
            GifError::Timeout => Some("Try again or check your network connection"),
            GifError::InvalidPattern(_) => Some("Check the regular expression syntax"),
            GifError::MissingApiKey(_) => {
                Some("Export the key or set it in the config file (giphy_api_key)")
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GifError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GifError::Timeout
        } else if let Some(status) = err.status() {
            GifError::Http(status.as_u16())
        } else if err.is_decode() {
            GifError::InvalidResponse
        } else {
            GifError::Network(err.to_string())
        }
    }
}

impl From<regex::Error> for GifError {
    fn from(err: regex::Error) -> Self {
        GifError::InvalidPattern(err.to_string())
    }
}

impl From<std::io::Error> for GifError {
    fn from(err: std::io::Error) -> Self {
        GifError::Io(err.to_string())
    }
}
