// ABOUTME: Centralized constants for the gifpeek CLI
// ABOUTME: Contains decode limits, terminal layout thresholds, timings, and env var names

/// Frame decoding limits
pub mod decode {
    /// Hard cap on frames decoded from one animation
    pub const MAX_FRAMES: usize = 60;

    /// Substituted for GIF frames that declare a zero delay
    pub const DEFAULT_FRAME_DELAY_MS: u32 = 80;
}

/// Interactive session timings and sizes
pub mod session {
    use std::time::Duration;

    /// Poll cadence for resize detection and manual animation
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    /// Longest the input reader waits on the terminal before rechecking for shutdown
    pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(50);

    /// Capacity of the key event channel fed by the input reader
    pub const INPUT_CHANNEL_CAPACITY: usize = 16;

    /// Decoded previews kept in memory for the session
    pub const PREVIEW_CACHE_ENTRIES: usize = 64;

    pub const FALLBACK_COLS: u16 = 80;
}

/// Layout thresholds for the interactive screen
pub mod layout {
    pub const SIDE_BY_SIDE_MIN_COLS: u16 = 70;
    pub const SIDE_BY_SIDE_MIN_ROWS: u16 = 12;
    pub const MIN_LIST_WIDTH: u16 = 24;
    pub const MIN_PREVIEW_COLS: u16 = 10;
    pub const MIN_PREVIEW_ROWS: u16 = 6;
    /// Fewest list rows kept when the preview sits below the list
    pub const MIN_LIST_ROWS: u16 = 3;
    pub const DEFAULT_CELL_ASPECT: f64 = 0.5;
}

/// Thumbnail listing geometry
pub mod thumbs {
    pub const THUMB_COLS: u16 = 16;
    pub const MIN_THUMB_ROWS: u16 = 3;
    pub const MAX_THUMB_ROWS: u16 = 10;
    pub const DEFAULT_THUMB_ROWS: u16 = 8;
}

/// Environment variables read by the CLI
pub mod env {
    pub const CELL_ASPECT: &str = "GIFPEEK_CELL_ASPECT";
    pub const SOFTWARE_ANIM: &str = "GIFPEEK_SOFTWARE_ANIM";
    pub const THUMBS: &str = "GIFPEEK_THUMBS";
    pub const FORCE_PROTOCOL: &str = "GIFPEEK_FORCE_PROTOCOL";
    pub const TENOR_API_KEY: &str = "TENOR_API_KEY";
    pub const GIPHY_API_KEY: &str = "GIPHY_API_KEY";
}
