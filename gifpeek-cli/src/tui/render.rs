// ABOUTME: Full-screen text rendering for the interactive browser
// ABOUTME: Writes header, result list, status, and preview caption using absolute cursor moves

use super::layout::Layout;
use super::state::{Mode, SessionState};
use crate::text::clip;
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};

pub const KEY_HINTS: &str = "Enter=search  / edit  ↑↓ select  d save  q quit";

/// Write `text` clipped to `width` columns at the start of 0-based `row`.
///
/// The rest of the line is cleared.
pub fn write_line_at<W: Write>(out: &mut W, row: u16, text: &str, width: u16) -> io::Result<()> {
    queue!(
        out,
        MoveTo(0, row),
        Print(clip(text, usize::from(width))),
        Clear(ClearType::UntilNewLine)
    )
}

/// Repaint every text row. The preview image is drawn separately, afterwards.
pub fn draw_screen<W: Write>(
    out: &mut W,
    state: &SessionState,
    layout: &Layout,
    protocol_name: &str,
) -> io::Result<()> {
    if layout.cols == 0 || layout.rows == 0 {
        return Ok(());
    }
    let width = layout.left_width;

    write_line_at(out, 0, &format!("gifpeek: GIF search ({})", protocol_name), width)?;
    let mode = match state.mode {
        Mode::Query => "query",
        Mode::Browse => "browse",
    };
    write_line_at(out, 1, &format!("Search [{}]: {}", mode, state.query), width)?;
    write_line_at(out, 2, KEY_HINTS, width)?;

    for offset in 0..layout.list_height {
        let index = state.scroll + usize::from(offset);
        let line = match state.results.get(index) {
            Some(result) => {
                let marker = if index == state.selected { "> " } else { "  " };
                format!("{}{}", marker, result.display_title())
            }
            None => String::new(),
        };
        write_line_at(out, layout.list_top + offset, &line, width)?;
    }

    let mut row = layout.status_row;
    write_line_at(out, row, &state.status, width)?;
    row += 1;

    if let Some(preview) = layout.preview.filter(|p| p.label_row.is_some()) {
        write_line_at(out, row, "Preview:", width)?;
        row += 1;
        for _ in 0..preview.rows {
            write_line_at(out, row, "", layout.cols)?;
            row += 1;
        }
    }

    while row < layout.rows {
        write_line_at(out, row, "", layout.cols)?;
        row += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gifpeek_sdk::GifResult;

    fn screen(state: &SessionState, layout: &Layout) -> String {
        let mut out = Vec::new();
        draw_screen(&mut out, state, layout, "kitty").unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_line_at_clips_and_clears() {
        let mut out = Vec::new();
        write_line_at(&mut out, 4, "hello world", 5).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[5;1Hhello\x1b[K");
    }

    #[test]
    fn test_draw_screen_lists_results() {
        let mut state = SessionState::new(80, 24);
        state.query = "cats".to_string();
        state.mode = Mode::Browse;
        state.set_results(vec![
            GifResult {
                id: "1".into(),
                title: "First  cat".into(),
                ..Default::default()
            },
            GifResult {
                id: "2".into(),
                title: "Second cat".into(),
                ..Default::default()
            },
        ]);
        state.selected = 1;
        let layout = Layout::compute(80, 24, None, 0.5);
        let output = screen(&state, &layout);

        assert!(output.contains("gifpeek: GIF search (kitty)"));
        assert!(output.contains("Search [browse]: cats"));
        assert!(output.contains("\x1b[4;1H  First cat\x1b[K"));
        assert!(output.contains("\x1b[5;1H> Second cat\x1b[K"));
        assert!(output.contains("\x1b[24;1H2 results\x1b[K"));
    }

    #[test]
    fn test_draw_screen_below_preview_caption() {
        let state = SessionState::new(60, 30);
        let layout = Layout::compute(60, 30, Some((200, 100)), 0.5);
        let output = screen(&state, &layout);
        let label_row = layout.preview.unwrap().label_row.unwrap();
        assert!(output.contains(&format!("\x1b[{};1HPreview:", label_row + 1)));
        assert!(output.contains("Type a search and press Enter"));
    }

    #[test]
    fn test_draw_screen_zero_size_writes_nothing() {
        let state = SessionState::new(0, 0);
        let layout = Layout::compute(0, 0, None, 0.5);
        assert_eq!(screen(&state, &layout), "");
    }
}
