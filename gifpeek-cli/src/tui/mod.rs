// ABOUTME: Interactive GIF browser: raw-mode session, event loop, and search/preview orchestration
// ABOUTME: All terminal, network, and input dependencies are injected through TuiEnv

pub mod animation;
pub mod input;
pub mod layout;
pub mod render;
pub mod state;

use crate::constants::session::{INPUT_CHANNEL_CAPACITY, PREVIEW_CACHE_ENTRIES, TICK_INTERVAL};
use crate::decode::{FrameSequence, decode_frames};
use crate::download;
use crate::error::{PreviewError, SessionError};
use crate::image_protocols::InlineProtocol;
use animation::AnimationDriver;
use crossterm::cursor::{Hide, Show};
use crossterm::queue;
use gifpeek_sdk::{FilterOptions, Fetcher, SearchOptions, SearchProvider, filter_results};
use input::{Key, KeySource};
use layout::Layout;
use state::{
    Mode, STATUS_EMPTY_QUERY, STATUS_NOTHING_TO_SAVE, STATUS_PROMPT, STATUS_SEARCHING,
    SessionState,
};
use std::collections::{HashMap, VecDeque};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};

/// Terminal mode and geometry operations the session needs.
pub trait TerminalControl {
    fn is_terminal(&self) -> bool;
    fn enable_raw_mode(&mut self) -> io::Result<()>;
    fn disable_raw_mode(&mut self) -> io::Result<()>;
    fn size(&self) -> io::Result<(u16, u16)>;
}

/// The process's real terminal via crossterm.
pub struct CrosstermTerminal;

impl TerminalControl for CrosstermTerminal {
    fn is_terminal(&self) -> bool {
        io::stdin().is_terminal() && io::stdout().is_terminal()
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }
}

/// Restores cooked mode when dropped, on every exit path.
struct RawModeGuard {
    terminal: Box<dyn TerminalControl>,
}

impl RawModeGuard {
    fn enter(mut terminal: Box<dyn TerminalControl>) -> Result<Self, SessionError> {
        terminal.enable_raw_mode().map_err(SessionError::RawMode)?;
        Ok(Self { terminal })
    }

    fn size(&self) -> io::Result<(u16, u16)> {
        self.terminal.size()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = self.terminal.disable_raw_mode() {
            log::warn!("Failed to restore terminal mode: {}", err);
        }
    }
}

pub struct TuiEnv<W: Write> {
    pub terminal: Box<dyn TerminalControl>,
    pub input: Box<dyn KeySource>,
    pub output: W,
    pub provider: Arc<dyn SearchProvider>,
    pub fetcher: Arc<dyn Fetcher>,
    /// Receives one message when the process is asked to stop.
    pub shutdown: mpsc::Receiver<()>,
}

#[derive(Debug, Clone)]
pub struct TuiSettings {
    pub protocol: InlineProtocol,
    pub software_animation: bool,
    pub cell_aspect: f64,
    pub search: SearchOptions,
    pub filter: FilterOptions,
    pub initial_query: Option<String>,
    /// Where `d` saves the selected GIF.
    pub download_dir: PathBuf,
}

/// Run one interactive session until the user quits or `shutdown` fires.
pub async fn run<W: Write>(env: TuiEnv<W>, settings: TuiSettings) -> Result<(), SessionError> {
    let TuiEnv {
        terminal,
        input,
        output,
        provider,
        fetcher,
        mut shutdown,
    } = env;

    if !terminal.is_terminal() {
        return Err(SessionError::NotTerminal);
    }
    let terminal = RawModeGuard::enter(terminal)?;
    let (cols, rows) = terminal.size().map_err(SessionError::Size)?;

    let (key_tx, key_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let stop = Arc::new(AtomicBool::new(false));
    input::spawn_input_reader(input, key_tx, Arc::clone(&stop))?;

    let mut engine = Engine::new(output, terminal, provider, fetcher, &settings, (cols, rows));
    let result = engine
        .event_loop(key_rx, &mut shutdown, settings.initial_query)
        .await;

    stop.store(true, Ordering::Relaxed);
    if let Err(err) = engine.teardown() {
        log::warn!("Terminal cleanup failed: {}", err);
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

#[derive(Clone)]
struct CachedPreview {
    frames: Arc<FrameSequence>,
    raw: Arc<Vec<u8>>,
}

/// Decoded previews keyed by source URL, evicting the oldest entry first.
struct PreviewCache {
    entries: HashMap<String, CachedPreview>,
    order: VecDeque<String>,
    capacity: usize,
}

impl PreviewCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
        }
    }

    fn get(&self, url: &str) -> Option<CachedPreview> {
        self.entries.get(url).cloned()
    }

    fn insert(&mut self, url: String, preview: CachedPreview) {
        if self.entries.insert(url.clone(), preview).is_none() {
            self.order.push_back(url);
        }
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

struct Engine<W: Write> {
    out: W,
    terminal: RawModeGuard,
    provider: Arc<dyn SearchProvider>,
    fetcher: Arc<dyn Fetcher>,
    search: SearchOptions,
    filter: FilterOptions,
    cell_aspect: f64,
    state: SessionState,
    driver: AnimationDriver,
    cache: PreviewCache,
    download_dir: PathBuf,
}

impl<W: Write> Engine<W> {
    fn new(
        out: W,
        terminal: RawModeGuard,
        provider: Arc<dyn SearchProvider>,
        fetcher: Arc<dyn Fetcher>,
        settings: &TuiSettings,
        (cols, rows): (u16, u16),
    ) -> Self {
        Self {
            out,
            terminal,
            provider,
            fetcher,
            search: settings.search.clone(),
            filter: settings.filter,
            cell_aspect: settings.cell_aspect,
            state: SessionState::new(cols, rows),
            driver: AnimationDriver::new(settings.protocol, settings.software_animation),
            cache: PreviewCache::new(PREVIEW_CACHE_ENTRIES),
            download_dir: settings.download_dir.clone(),
        }
    }

    async fn event_loop(
        &mut self,
        mut keys: mpsc::Receiver<Key>,
        shutdown: &mut mpsc::Receiver<()>,
        initial_query: Option<String>,
    ) -> Result<(), SessionError> {
        queue!(self.out, Hide)?;

        if let Some(query) = initial_query.filter(|q| !q.trim().is_empty()) {
            self.state.query = query;
            self.state.mode = Mode::Browse;
            self.submit().await?;
        }

        let mut ticker = tokio::time::interval(TICK_INTERVAL);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut input_open = true;

        loop {
            let flow = self
                .step(&mut keys, shutdown, &mut ticker, &mut input_open)
                .await?;
            if flow == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// One loop iteration: handle at most one event, then repaint at most once.
    async fn step(
        &mut self,
        keys: &mut mpsc::Receiver<Key>,
        shutdown: &mut mpsc::Receiver<()>,
        ticker: &mut Interval,
        input_open: &mut bool,
    ) -> Result<Flow, SessionError> {
        tokio::select! {
            biased;
            Some(()) = shutdown.recv() => return Ok(Flow::Quit),
            key = keys.recv(), if *input_open => match key {
                Some(key) => {
                    if self.handle_key(key).await? == Flow::Quit {
                        return Ok(Flow::Quit);
                    }
                }
                None => *input_open = false,
            },
            _ = ticker.tick() => {}
        }

        self.poll_size();
        if self.state.render_dirty {
            self.render()?;
        }
        self.advance(Instant::now())?;
        Ok(Flow::Continue)
    }

    async fn handle_key(&mut self, key: Key) -> Result<Flow, SessionError> {
        if matches!(key, Key::CtrlC | Key::Char('q')) {
            return Ok(Flow::Quit);
        }

        match self.state.mode {
            Mode::Query => match key {
                Key::Char(c) => {
                    self.state.query.push(c);
                    self.state.render_dirty = true;
                }
                Key::Backspace => {
                    if self.state.query.pop().is_some() {
                        self.state.render_dirty = true;
                    }
                }
                Key::Enter => {
                    if self.state.query.trim().is_empty() {
                        self.state.status = STATUS_EMPTY_QUERY.to_string();
                        self.state.render_dirty = true;
                    } else {
                        self.submit().await?;
                    }
                }
                Key::Esc => {
                    if !self.state.results.is_empty() {
                        self.state.mode = Mode::Browse;
                        self.state.render_dirty = true;
                    }
                }
                _ => {}
            },
            Mode::Browse => match key {
                Key::Char('/') | Key::Enter => {
                    self.state.mode = Mode::Query;
                    self.state.status = STATUS_PROMPT.to_string();
                    self.state.render_dirty = true;
                }
                Key::Esc => {
                    self.state.mode = Mode::Query;
                    self.state.render_dirty = true;
                }
                Key::Up | Key::Down => {
                    if self.state.move_selection(key == Key::Down) {
                        self.load_selected_image().await;
                        self.sync_layout();
                        self.state.render_dirty = true;
                    }
                }
                Key::Char('d') => {
                    self.state.status = self.download_selected().await;
                    self.state.render_dirty = true;
                }
                _ => {}
            },
        }
        Ok(Flow::Continue)
    }

    /// Search for the current query, then filter. Blocks the loop until the provider answers.
    async fn submit(&mut self) -> Result<(), SessionError> {
        self.state.status = STATUS_SEARCHING.to_string();
        self.render()?;

        let query = self.state.query.clone();
        match self.provider.search(&query, &self.search).await {
            Err(err) => {
                log::debug!("search for {:?} failed: {}", query, err);
                self.state.status = format!("Search error: {}", err);
            }
            Ok(results) => match filter_results(results, &query, &self.filter) {
                Err(err) => self.state.status = format!("Filter error: {}", err),
                Ok(results) => {
                    self.state.set_results(results);
                    self.load_selected_image().await;
                }
            },
        }
        self.state.mode = Mode::Browse;
        self.state.render_dirty = true;
        Ok(())
    }

    async fn load_selected_image(&mut self) {
        let Some(source) = self
            .state
            .selected_result()
            .map(|result| result.preview_source().to_string())
            .filter(|source| !source.is_empty())
        else {
            self.driver.clear_animation();
            return;
        };
        if !self.driver.enabled() {
            return;
        }

        if let Some(preview) = self.cache.get(&source) {
            self.driver.set_animation(preview.frames, preview.raw);
            return;
        }
        match self.fetch_preview(&source).await {
            Ok(preview) => {
                self.cache.insert(source, preview.clone());
                self.driver.set_animation(preview.frames, preview.raw);
            }
            Err(err) => {
                log::debug!("no preview for {}: {}", source, err);
                self.driver.clear_animation();
            }
        }
    }

    /// Save the selected GIF and describe the outcome for the status line.
    async fn download_selected(&mut self) -> String {
        let Some(result) = self.state.selected_result().cloned() else {
            return STATUS_NOTHING_TO_SAVE.to_string();
        };
        if result.url.is_empty() {
            return STATUS_NOTHING_TO_SAVE.to_string();
        }

        let bytes = match self.cache.get(&result.url) {
            Some(cached) => cached.raw,
            None => match self.fetcher.fetch(&result.url).await {
                Ok(bytes) => Arc::new(bytes),
                Err(err) => return format!("Download error: {}", err),
            },
        };
        let name = download::filename_for_result(&result);
        match download::save_unique(&self.download_dir, &name, &bytes) {
            Ok(path) => {
                log::debug!("saved {} to {}", result.url, path.display());
                format!("Saved {}", path.display())
            }
            Err(err) => format!("Download error: {}", err),
        }
    }

    async fn fetch_preview(&self, source: &str) -> Result<CachedPreview, PreviewError> {
        let bytes = self.fetcher.fetch(source).await?;
        let frames = decode_frames(&bytes)?;
        Ok(CachedPreview {
            frames: Arc::new(frames),
            raw: Arc::new(bytes),
        })
    }

    /// Layout for the current size and image, with the selection scrolled into view.
    fn sync_layout(&mut self) -> Layout {
        let layout = Layout::compute(
            self.state.cols,
            self.state.rows,
            self.driver.image_size(),
            self.cell_aspect,
        );
        self.state.ensure_visible(usize::from(layout.list_height));
        layout
    }

    /// A failed size read keeps the previous size.
    fn poll_size(&mut self) {
        match self.terminal.size() {
            Ok((cols, rows)) => {
                if self.state.resize(cols, rows) {
                    self.sync_layout();
                    self.driver.mark_dirty();
                }
            }
            Err(err) => log::debug!("terminal size unavailable: {}", err),
        }
    }

    fn render(&mut self) -> Result<(), SessionError> {
        let layout = self.sync_layout();
        render::draw_screen(&mut self.out, &self.state, &layout, self.driver.protocol_name())?;

        match layout.preview {
            Some(area) => {
                // Text redraws erase images that have no independent placement
                if !self.driver.supports_placement() {
                    self.driver.mark_dirty();
                }
                if let Err(err) = self.driver.draw(
                    &mut self.out,
                    (area.col, area.row),
                    (area.cols, area.rows),
                    Instant::now(),
                ) {
                    log::debug!("preview not shown: {}", err);
                }
            }
            None => self.driver.hide(&mut self.out)?,
        }

        self.out.flush()?;
        self.state.render_dirty = false;
        Ok(())
    }

    fn advance(&mut self, now: Instant) -> Result<(), SessionError> {
        match self.driver.advance(&mut self.out, now) {
            Ok(true) => self.out.flush()?,
            Ok(false) => {}
            Err(err) => log::debug!("animation frame not shown: {}", err),
        }
        Ok(())
    }

    fn teardown(&mut self) -> io::Result<()> {
        queue!(self.out, Show)?;
        self.driver.clear_all(&mut self.out)?;
        self.out.flush()
    }
}
