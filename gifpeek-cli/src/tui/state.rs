// ABOUTME: Mutable session state for the interactive browser
// ABOUTME: Query text, results, selection window, status line, and last terminal size

use gifpeek_sdk::GifResult;

pub const STATUS_PROMPT: &str = "Type a search and press Enter";
pub const STATUS_SEARCHING: &str = "Searching...";
pub const STATUS_EMPTY_QUERY: &str = "Empty query";
pub const STATUS_NO_RESULTS: &str = "No results";
pub const STATUS_NOTHING_TO_SAVE: &str = "Nothing to download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Query,
    Browse,
}

#[derive(Debug)]
pub struct SessionState {
    pub mode: Mode,
    pub query: String,
    pub results: Vec<GifResult>,
    pub selected: usize,
    pub scroll: usize,
    pub status: String,
    pub cols: u16,
    pub rows: u16,
    pub render_dirty: bool,
}

impl SessionState {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            mode: Mode::Query,
            query: String::new(),
            results: Vec::new(),
            selected: 0,
            scroll: 0,
            status: STATUS_PROMPT.to_string(),
            cols,
            rows,
            render_dirty: true,
        }
    }

    pub fn selected_result(&self) -> Option<&GifResult> {
        self.results.get(self.selected)
    }

    pub fn set_results(&mut self, results: Vec<GifResult>) {
        self.status = if results.is_empty() {
            STATUS_NO_RESULTS.to_string()
        } else {
            format!("{} results", results.len())
        };
        self.results = results;
        self.selected = 0;
        self.scroll = 0;
    }

    /// Move the selection by one row. Returns false at either end of the list.
    pub fn move_selection(&mut self, down: bool) -> bool {
        if down && self.selected + 1 < self.results.len() {
            self.selected += 1;
            true
        } else if !down && self.selected > 0 {
            self.selected -= 1;
            true
        } else {
            false
        }
    }

    /// Adjust `scroll` so `selected` lies in `scroll..scroll + list_height`.
    pub fn ensure_visible(&mut self, list_height: usize) {
        if list_height == 0 {
            self.scroll = self.selected;
            return;
        }
        if self.selected < self.scroll {
            self.scroll = self.selected;
        }
        if self.selected >= self.scroll + list_height {
            self.scroll = self.selected + 1 - list_height;
        }
    }

    /// Record a new terminal size. Returns true when it changed.
    pub fn resize(&mut self, cols: u16, rows: u16) -> bool {
        if (cols, rows) == (self.cols, self.rows) {
            return false;
        }
        self.cols = cols;
        self.rows = rows;
        self.render_dirty = true;
        true
    }
}
