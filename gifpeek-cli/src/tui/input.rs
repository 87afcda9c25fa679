// ABOUTME: Key input for the interactive session, read through crossterm terminal events
// ABOUTME: A dedicated thread polls a key source and posts keys into a bounded tokio channel

use crate::constants::session::INPUT_POLL_INTERVAL;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Esc,
    Up,
    Down,
    CtrlC,
}

/// Outcome of one bounded wait for input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polled {
    Key(Key),
    /// Nothing usable arrived before the timeout.
    Idle,
    /// The source has no more input.
    Closed,
}

/// Where the reader thread gets keys from.
pub trait KeySource: Send {
    /// Wait at most `timeout` for the next key.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Polled>;
}

/// Keys from the process terminal.
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Polled> {
        if !event::poll(timeout)? {
            return Ok(Polled::Idle);
        }
        Ok(match event::read()? {
            Event::Key(key) => map_key_event(key).map_or(Polled::Idle, Polled::Key),
            _ => Polled::Idle,
        })
    }
}

/// Keys the session reacts to. Releases and other keys map to `None`.
pub fn map_key_event(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('c') if ctrl => Some(Key::CtrlC),
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => None,
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        _ => None,
    }
}

/// Start the key reader thread.
///
/// The thread checks `stop` between polls, so it exits within one poll
/// interval of `stop` being set. It also exits when the source closes, on a
/// read error, or once the receiving side of `keys` is dropped. It is never joined.
pub fn spawn_input_reader(
    mut source: Box<dyn KeySource>,
    keys: mpsc::Sender<Key>,
    stop: Arc<AtomicBool>,
) -> io::Result<()> {
    thread::Builder::new()
        .name("gifpeek-input".to_string())
        .spawn(move || {
            while !stop.load(Ordering::Relaxed) && !keys.is_closed() {
                match source.poll_key(INPUT_POLL_INTERVAL) {
                    Ok(Polled::Key(key)) => {
                        if keys.blocking_send(key).is_err() {
                            break;
                        }
                    }
                    Ok(Polled::Idle) => {}
                    Ok(Polled::Closed) => break,
                    Err(err) => {
                        log::debug!("input reader stopped: {}", err);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}
