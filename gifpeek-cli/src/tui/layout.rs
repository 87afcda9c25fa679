// ABOUTME: Screen layout for the interactive browser
// ABOUTME: Places the result list and preview beside or below each other and fits the image

use crate::constants::layout::{
    MIN_LIST_ROWS, MIN_LIST_WIDTH, MIN_PREVIEW_COLS, MIN_PREVIEW_ROWS, SIDE_BY_SIDE_MIN_COLS,
    SIDE_BY_SIDE_MIN_ROWS,
};

/// Rows used by the title, query, and key hint lines.
pub const HEADER_ROWS: u16 = 3;

/// Where the preview image goes, in 0-based cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewArea {
    pub col: u16,
    pub row: u16,
    pub cols: u16,
    pub rows: u16,
    /// "Preview:" caption row when the preview sits below the list.
    pub label_row: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
    pub side_by_side: bool,
    pub left_width: u16,
    pub list_top: u16,
    pub list_height: u16,
    pub status_row: u16,
    pub preview: Option<PreviewArea>,
}

impl Layout {
    /// `image` is the pixel size of the current preview, if one is loaded.
    pub fn compute(cols: u16, rows: u16, image: Option<(u32, u32)>, cell_aspect: f64) -> Self {
        let side_by_side = cols >= SIDE_BY_SIDE_MIN_COLS && rows >= SIDE_BY_SIDE_MIN_ROWS;
        let left_width = if side_by_side {
            MIN_LIST_WIDTH.max(cols / 3).min(cols.saturating_sub(2))
        } else {
            cols
        };

        let (mut preview_cols, mut preview_rows) = match image {
            Some((width, height)) => {
                let (avail_cols, avail_rows) =
                    available_preview_size(cols, rows, left_width, side_by_side);
                fit_preview_size(avail_cols, avail_rows, width, height, cell_aspect)
            }
            None => (0, 0),
        };

        let full_list = rows.saturating_sub(HEADER_ROWS + 1);
        let mut list_height = full_list;
        if !side_by_side && preview_rows > 0 {
            list_height = full_list.saturating_sub(preview_rows + 2);
            if list_height < MIN_LIST_ROWS {
                log::debug!("{}x{} too small for a preview below the list", cols, rows);
                preview_cols = 0;
                preview_rows = 0;
                list_height = full_list;
            }
        }

        let list_top = HEADER_ROWS;
        let status_row = list_top + list_height;
        let preview = (preview_cols > 0 && preview_rows > 0).then(|| {
            if side_by_side {
                PreviewArea {
                    col: left_width + 1,
                    row: list_top,
                    cols: preview_cols,
                    rows: preview_rows,
                    label_row: None,
                }
            } else {
                PreviewArea {
                    col: 0,
                    row: status_row + 2,
                    cols: preview_cols,
                    rows: preview_rows,
                    label_row: Some(status_row + 1),
                }
            }
        });

        Self {
            cols,
            rows,
            side_by_side,
            left_width,
            list_top,
            list_height,
            status_row,
            preview,
        }
    }
}

/// Cell box available for the preview, or (0, 0) when there is no room.
pub fn available_preview_size(
    cols: u16,
    rows: u16,
    left_width: u16,
    side_by_side: bool,
) -> (u16, u16) {
    if cols == 0 || rows == 0 {
        return (0, 0);
    }
    if side_by_side {
        let avail_cols = cols.saturating_sub(left_width + 2);
        let avail_rows = rows.saturating_sub(HEADER_ROWS + 1);
        if avail_cols < MIN_PREVIEW_COLS || avail_rows < MIN_PREVIEW_ROWS {
            return (0, 0);
        }
        return (avail_cols, avail_rows);
    }
    let avail_rows = (rows / 3)
        .max(MIN_PREVIEW_ROWS)
        .min(rows.saturating_sub(MIN_PREVIEW_ROWS));
    if cols < MIN_PREVIEW_COLS || avail_rows == 0 {
        return (0, 0);
    }
    (cols, avail_rows)
}

/// Largest cell box inside the available area matching the image's aspect ratio.
///
/// Unknown (zero) image dimensions fill the whole area.
pub fn fit_preview_size(
    avail_cols: u16,
    avail_rows: u16,
    width: u32,
    height: u32,
    cell_aspect: f64,
) -> (u16, u16) {
    if avail_cols == 0 || avail_rows == 0 {
        return (0, 0);
    }
    if width == 0 || height == 0 {
        return (avail_cols, avail_rows);
    }
    let ratio = f64::from(height) / f64::from(width);
    let mut target_cols = f64::from(avail_cols);
    let mut target_rows = (target_cols * cell_aspect * ratio).round();
    if target_rows > f64::from(avail_rows) {
        target_rows = f64::from(avail_rows);
        target_cols = (target_rows / cell_aspect / ratio).round();
    }
    let clamp = |value: f64, max: u16| (value.max(1.0) as u16).min(max);
    (clamp(target_cols, avail_cols), clamp(target_rows, avail_rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_by_side_layout() {
        let layout = Layout::compute(80, 24, Some((100, 100)), 0.5);
        assert!(layout.side_by_side);
        assert_eq!(layout.left_width, 26);
        assert_eq!(layout.list_height, 20);
        assert_eq!(layout.status_row, 23);
        let preview = layout.preview.unwrap();
        assert_eq!((preview.col, preview.row), (27, 3));
        // 52 cols at aspect 0.5 gives 26 rows, capped to 20 rows and 40 cols
        assert_eq!((preview.cols, preview.rows), (40, 20));
    }

    #[test]
    fn test_narrow_layout_puts_preview_below() {
        let layout = Layout::compute(60, 30, Some((200, 100)), 0.5);
        assert!(!layout.side_by_side);
        assert_eq!(layout.left_width, 60);
        let preview = layout.preview.unwrap();
        // 30 / 3 = 10 rows available; 60 cols wide image needs 15, so 10 rows by 40 cols
        assert_eq!((preview.cols, preview.rows), (40, 10));
        assert_eq!(layout.list_height, 30 - 4 - 10 - 2);
        assert_eq!(preview.label_row, Some(layout.status_row + 1));
        assert_eq!(preview.row, layout.status_row + 2);
    }

    #[test]
    fn test_small_terminal_suppresses_preview() {
        let layout = Layout::compute(40, 10, Some((100, 100)), 0.5);
        assert!(layout.preview.is_none());
        assert_eq!(layout.list_height, 6);
    }

    #[test]
    fn test_no_image_uses_full_list() {
        let layout = Layout::compute(60, 30, None, 0.5);
        assert!(layout.preview.is_none());
        assert_eq!(layout.list_height, 26);
    }

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout = Layout::compute(5, 2, Some((10, 10)), 0.5);
        assert_eq!(layout.list_height, 0);
        assert!(layout.preview.is_none());
        assert_eq!(Layout::compute(0, 0, None, 0.5).list_height, 0);
    }

    #[test]
    fn test_available_preview_size() {
        assert_eq!(available_preview_size(80, 24, 26, true), (52, 20));
        assert_eq!(available_preview_size(70, 12, 60, true), (0, 0));
        assert_eq!(available_preview_size(40, 10, 40, false), (40, 4));
        assert_eq!(available_preview_size(9, 30, 9, false), (0, 0));
        assert_eq!(available_preview_size(40, 5, 40, false), (0, 0));
    }

    #[test]
    fn test_fit_preview_size() {
        assert_eq!(fit_preview_size(40, 20, 0, 0, 0.5), (40, 20));
        assert_eq!(fit_preview_size(40, 20, 400, 100, 0.5), (40, 5));
        assert_eq!(fit_preview_size(40, 10, 100, 400, 0.5), (5, 10));
        assert_eq!(fit_preview_size(40, 20, 10_000, 1, 0.5), (40, 1));
        assert_eq!(fit_preview_size(0, 20, 10, 10, 0.5), (0, 0));
    }
}
