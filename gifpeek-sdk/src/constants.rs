// ABOUTME: Centralized constants for the gifpeek SDK
// ABOUTME: Contains provider endpoints, fetch timeouts, and request limits

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Timeout for a single source fetch (preview or full GIF)
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Timeout for provider search requests
    pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Provider URLs and identifiers
pub mod urls {
    /// Base URL for the Tenor v2 API
    pub const TENOR_API_BASE: &str = "https://tenor.googleapis.com";

    /// Public Tenor key used when no key is configured
    pub const TENOR_PUBLIC_KEY: &str = "LIVDSRZULELA";

    /// Base URL for the Giphy v1 API
    pub const GIPHY_API_BASE: &str = "https://api.giphy.com";

    /// Client key reported to Tenor
    pub const TENOR_CLIENT_KEY: &str = "gifpeek";

    /// User agent sent with every request
    pub const USER_AGENT: &str = "gifpeek";
}

/// Request limits
pub mod limits {
    /// Default number of results requested from a provider
    pub const DEFAULT_LIMIT: u32 = 20;

    /// Upper bound accepted by both providers for a single page
    pub const MAX_LIMIT: u32 = 50;
}
