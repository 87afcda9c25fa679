// ABOUTME: Character-width helpers for fitting text into terminal columns
// ABOUTME: Truncation with and without ellipsis plus hard wrapping for URLs

/// Keep at most `width` characters, dropping the rest.
pub fn clip(text: &str, width: usize) -> &str {
    match text.char_indices().nth(width) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

/// Shorten to `width` characters, ending in "…" when anything was cut.
/// A width of 0 means unlimited.
pub fn truncate_with_ellipsis(text: &str, width: usize) -> String {
    if width == 0 || text.chars().count() <= width {
        return text.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }
    format!("{}…", clip(text, width - 1))
}

/// Split into chunks of exactly `width` characters (the last may be shorter).
pub fn wrap_hard(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|chunk| chunk.iter().collect()).collect()
}
