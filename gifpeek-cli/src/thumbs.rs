// ABOUTME: Non-interactive result listing with inline thumbnails beside title and url text
// ABOUTME: Falls back to a two-line text block per result whenever a thumbnail cannot be shown

use crate::constants::thumbs::{DEFAULT_THUMB_ROWS, MAX_THUMB_ROWS, MIN_THUMB_ROWS, THUMB_COLS};
use crate::decode::{DecodeOptions, decode_frames_with};
use crate::error::PreviewError;
use crate::image_protocols::{ITerm2Protocol, ImageProtocol, InlineProtocol, KittyProtocol, sniff};
use crate::text::{truncate_with_ellipsis, wrap_hard};
use gifpeek_sdk::{Fetcher, GifResult};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Written after an iTerm thumbnail so the next block starts on a clean line.
const ITERM_BLOCK_SEPARATOR: &str = "\r\x1b[K\n";

pub struct ThumbRenderer<'a> {
    fetcher: &'a dyn Fetcher,
    protocol: InlineProtocol,
    use_color: bool,
    number: bool,
    term_cols: u16,
    cell_aspect: f64,
}

impl<'a> ThumbRenderer<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, protocol: InlineProtocol) -> Self {
        Self {
            fetcher,
            protocol,
            use_color: false,
            number: false,
            term_cols: 0,
            cell_aspect: crate::constants::layout::DEFAULT_CELL_ASPECT,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// Prefix each title with its 1-based position.
    pub fn with_numbers(mut self, number: bool) -> Self {
        self.number = number;
        self
    }

    /// Terminal width used to fit the text beside each thumbnail. 0 disables fitting.
    pub fn with_term_cols(mut self, term_cols: u16) -> Self {
        self.term_cols = term_cols;
        self
    }

    pub fn with_cell_aspect(mut self, cell_aspect: f64) -> Self {
        self.cell_aspect = cell_aspect;
        self
    }

    /// Write one block per result, separated by exactly one blank line.
    pub async fn render<W: Write>(&self, out: &mut W, results: &[GifResult]) -> io::Result<()> {
        let mut next_id = 1;
        for (index, result) in results.iter().enumerate() {
            let prefix = if self.number {
                format!("{}. ", index + 1)
            } else {
                String::new()
            };
            let title = result.display_title();
            let last = index + 1 == results.len();

            if self.protocol != InlineProtocol::None {
                let mut block = Vec::new();
                match self
                    .thumb_block(&mut block, next_id, result, &prefix, &title)
                    .await
                {
                    Ok(()) => {
                        next_id += 1;
                        out.write_all(&block)?;
                        if !last {
                            match self.protocol {
                                InlineProtocol::Iterm => {
                                    out.write_all(ITERM_BLOCK_SEPARATOR.as_bytes())?
                                }
                                _ => writeln!(out)?,
                            }
                        }
                        continue;
                    }
                    Err(err) => log::debug!("thumbnail for {} not shown: {}", result.id, err),
                }
            }

            self.text_block(out, result, &prefix, &title)?;
            if !last {
                writeln!(out)?;
            }
        }
        out.flush()
    }

    fn text_block<W: Write>(
        &self,
        out: &mut W,
        result: &GifResult,
        prefix: &str,
        title: &str,
    ) -> io::Result<()> {
        let title = format!("{}{}", prefix, title);
        writeln!(out, "{}", self.paint_title(&title))?;
        writeln!(out, "  {}", self.paint_url(&result.url))
    }

    /// Image plus text rows, written to `block` only in full.
    async fn thumb_block(
        &self,
        block: &mut Vec<u8>,
        id: u32,
        result: &GifResult,
        prefix: &str,
        title: &str,
    ) -> Result<(), PreviewError> {
        let source = result.preview_source();
        let mut data = self.fetcher.fetch(source).await?;

        let dims = sniff::dimensions(&data).or_else(|| {
            (result.width > 0 && result.height > 0).then_some((result.width, result.height))
        });
        let cols = THUMB_COLS;
        let rows = thumb_rows(dims, self.cell_aspect);

        let indent = match self.protocol {
            InlineProtocol::Kitty => {
                let frames = decode_frames_with(&data, DecodeOptions::first_frame())?;
                let frame = frames.frames.first().ok_or(PreviewError::NoFrames)?;
                KittyProtocol.transmit(block, id, &frame.png, cols, rows)?;
                cols + 2
            }
            InlineProtocol::Iterm => {
                if !sniff::is_iterm_supported(&data)
                    && source != result.url
                    && !result.url.is_empty()
                {
                    match self.fetcher.fetch(&result.url).await {
                        Ok(fallback) => data = fallback,
                        Err(err) => log::debug!("alternate source {} failed: {}", result.url, err),
                    }
                }
                block.write_all(b"\r")?;
                ITerm2Protocol { stretch: true }.transmit(block, id, &data, cols, rows)?;
                if rows > 1 {
                    write!(block, "\x1b[{}A", rows - 1)?;
                }
                cols
            }
            InlineProtocol::None => return Err(PreviewError::NoProtocol),
        };

        let text_width = usize::from(self.term_cols.saturating_sub(indent + 1));
        for (row, line) in text_rows(prefix, title, &result.url, rows, text_width)
            .into_iter()
            .enumerate()
        {
            let line = match (row, line.is_empty()) {
                (_, true) => line,
                (0, false) => self.paint_title(&line),
                (_, false) => self.paint_url(&line),
            };
            match self.protocol {
                InlineProtocol::Iterm => write!(block, "\x1b[{}G{}\x1b[K\n", indent + 1, line)?,
                _ => writeln!(block, "{}{}", " ".repeat(usize::from(indent)), line)?,
            }
        }
        Ok(())
    }

    fn paint_title(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_url(&self, text: &str) -> String {
        if self.use_color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Cell rows for a thumbnail `THUMB_COLS` wide, following the image aspect.
pub fn thumb_rows(dims: Option<(u32, u32)>, cell_aspect: f64) -> u16 {
    match dims {
        Some((width, height)) if width > 0 && height > 0 => {
            let rows = f64::from(THUMB_COLS) * cell_aspect * f64::from(height) / f64::from(width);
            (rows as u16).clamp(MIN_THUMB_ROWS, MAX_THUMB_ROWS)
        }
        _ => DEFAULT_THUMB_ROWS,
    }
}

/// Exactly `rows` lines: the title, then the wrapped url, then blanks.
///
/// A url needing more than `rows - 1` lines is cut and marked with "…".
fn text_rows(prefix: &str, title: &str, url: &str, rows: u16, width: usize) -> Vec<String> {
    let rows = usize::from(rows.max(1));
    let mut url_lines = wrap_hard(url, width);
    if url_lines.len() > rows - 1 {
        url_lines.truncate(rows - 1);
        if let Some(last) = url_lines.last_mut() {
            *last = truncate_with_ellipsis(&format!("{}…", last), width);
        }
    }

    let mut lines = Vec::with_capacity(rows);
    lines.push(truncate_with_ellipsis(&format!("{}{}", prefix, title), width));
    lines.extend(url_lines);
    lines.resize(rows, String::new());
    lines
}
