// ABOUTME: CLI argument definitions for gifpeek
// ABOUTME: Defines the command-line interface structure using clap derive macros

use crate::image_protocols::ThumbsMode;
use crate::output::ListingFormat;
use crate::providers::SearchSource;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "gifpeek")]
#[command(about = "Search GIFs from the terminal with inline animated previews", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Search terms (joined with spaces)
    #[arg(value_name = "QUERY", required_unless_present = "tui")]
    pub query: Vec<String>,

    /// Browse results interactively with an animated preview
    #[arg(long)]
    pub tui: bool,

    /// GIF provider to search
    #[arg(long, value_enum)]
    pub source: Option<SearchSource>,

    /// Maximum number of results to fetch
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub limit: Option<u32>,

    /// Prefix each listed result with its number
    #[arg(short = 'n', long)]
    pub number: bool,

    /// Match the query case-insensitively when filtering
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Drop results matching the query instead of keeping them
    #[arg(short = 'v', long)]
    pub invert: bool,

    /// Treat the query as a regular expression when filtering
    #[arg(short = 'E', long)]
    pub regex: bool,

    /// Listing format
    #[arg(long, value_enum)]
    pub format: Option<ListingFormat>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    pub json: bool,

    /// Inline thumbnails in the plain listing
    #[arg(long, value_enum)]
    pub thumbs: Option<ThumbsMode>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Force colored output even when piped
    #[arg(long, conflicts_with = "no_color")]
    pub force_color: bool,

    /// Enable verbose output for debugging
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    /// The search terms as one query string.
    pub fn query_text(&self) -> String {
        self.query.join(" ")
    }
}
