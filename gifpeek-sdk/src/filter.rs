// ABOUTME: grep-style filtering of provider results against the query
// ABOUTME: Supports regex, case-insensitive, and inverted matching over title and tags

use crate::{GifResult, Result};
use regex::RegexBuilder;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub ignore_case: bool,
    pub invert: bool,
    pub regex: bool,
}

impl FilterOptions {
    /// Filtering only narrows results when the caller asked for grep semantics.
    pub fn is_active(&self) -> bool {
        self.regex || self.invert
    }
}

/// Keep (or with `invert`, drop) results whose title or tags match `query`.
///
/// Without `regex` or `invert` the provider's ranking is trusted and the list
/// is returned untouched.
pub fn filter_results(
    results: Vec<GifResult>,
    query: &str,
    options: &FilterOptions,
) -> Result<Vec<GifResult>> {
    if !options.is_active() {
        return Ok(results);
    }

    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query.trim())
    };
    let matcher = RegexBuilder::new(&pattern)
        .case_insensitive(options.ignore_case)
        .build()?;

    Ok(results
        .into_iter()
        .filter(|result| {
            let hit = matcher.is_match(&result.title)
                || result.tags.iter().any(|tag| matcher.is_match(tag));
            hit != options.invert
        })
        .collect())
}
