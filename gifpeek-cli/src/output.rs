// ABOUTME: Listing formats for search results in non-interactive mode
// ABOUTME: Machine-friendly formatters (tsv, markdown, url, json) behind a common trait

use anyhow::Result;
use gifpeek_sdk::GifResult;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ListingFormat {
    /// Thumbnails on a terminal, urls when piped
    #[default]
    Auto,
    /// Thumbnails or title/url text blocks
    Plain,
    /// title<TAB>url
    Tsv,
    /// Markdown image links
    Md,
    /// One url per line
    Url,
    /// Pretty-printed JSON array
    Json,
}

impl ListingFormat {
    /// Settle `Auto` and the `--json` shorthand into a concrete format.
    pub fn resolve(self, json: bool, is_tty: bool) -> ListingFormat {
        if json {
            return ListingFormat::Json;
        }
        match self {
            ListingFormat::Auto if is_tty => ListingFormat::Plain,
            ListingFormat::Auto => ListingFormat::Url,
            other => other,
        }
    }
}

pub trait OutputFormat {
    fn format_results(&self, results: &[GifResult]) -> Result<String>;
}

pub struct TsvFormatter;

impl OutputFormat for TsvFormatter {
    fn format_results(&self, results: &[GifResult]) -> Result<String> {
        Ok(lines(results, |r| format!("{}\t{}", r.display_title(), r.url)))
    }
}

pub struct MarkdownFormatter;

impl OutputFormat for MarkdownFormatter {
    fn format_results(&self, results: &[GifResult]) -> Result<String> {
        Ok(lines(results, |r| {
            format!("![{}]({})", r.display_title().replace(['[', ']'], ""), r.url)
        }))
    }
}

pub struct UrlFormatter;

impl OutputFormat for UrlFormatter {
    fn format_results(&self, results: &[GifResult]) -> Result<String> {
        Ok(lines(results, |r| r.url.clone()))
    }
}

pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormat for JsonFormatter {
    fn format_results(&self, results: &[GifResult]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(results)?
        } else {
            serde_json::to_string(results)?
        };
        Ok(format!("{}\n", json))
    }
}

/// Formatter for a resolved machine format. `Plain` and `Auto` have none.
pub fn formatter_for(format: ListingFormat) -> Option<Box<dyn OutputFormat>> {
    match format {
        ListingFormat::Tsv => Some(Box::new(TsvFormatter)),
        ListingFormat::Md => Some(Box::new(MarkdownFormatter)),
        ListingFormat::Url => Some(Box::new(UrlFormatter)),
        ListingFormat::Json => Some(Box::new(JsonFormatter::new(true))),
        ListingFormat::Plain | ListingFormat::Auto => None,
    }
}

fn lines(results: &[GifResult], line: impl Fn(&GifResult) -> String) -> String {
    results.iter().map(|r| line(r) + "\n").collect()
}
