// ABOUTME: Saving the selected GIF from the interactive browser to disk
// ABOUTME: Derives a safe file name from the result title and never overwrites existing files

use gifpeek_sdk::GifResult;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const MAX_STEM_CHARS: usize = 64;
const FALLBACK_STEM: &str = "gif";

/// Where downloads go: the configured directory, else the user's download
/// directory, else the current directory.
pub fn download_dir(configured: Option<PathBuf>) -> PathBuf {
    configured
        .or_else(dirs::download_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Reduce `name` to letters, digits, `-` and `.`, joined by single underscores.
pub fn sanitize_filename(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_alphanumeric() || c == '-' || c == '.' {
            cleaned.push(c);
        } else if !cleaned.ends_with('_') {
            cleaned.push('_');
        }
    }
    let stem: String = cleaned
        .trim_matches(|c| matches!(c, '_' | '.' | '-'))
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    }
}

pub fn filename_for_result(result: &GifResult) -> String {
    let title = result.display_title();
    let stem = match title.len().checked_sub(4) {
        Some(cut) if title.is_char_boundary(cut) && title[cut..].eq_ignore_ascii_case(".gif") => {
            &title[..cut]
        }
        _ => title.as_str(),
    };
    format!("{}.gif", sanitize_filename(stem))
}

/// Write `bytes` to `dir/name`, or `dir/<stem>-<n>.<ext>` for the first free `n`.
pub fn save_unique(dir: &Path, name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };

    let mut attempt = 0u32;
    loop {
        let candidate = match (attempt, ext) {
            (0, _) => dir.join(name),
            (n, Some(ext)) => dir.join(format!("{}-{}.{}", stem, n, ext)),
            (n, None) => dir.join(format!("{}-{}", stem, n)),
        };
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut file) => {
                file.write_all(bytes)?;
                return Ok(candidate);
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(err) => return Err(err),
        }
    }
}
