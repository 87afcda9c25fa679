// ABOUTME: Preview image lifecycle and playback for the interactive browser
// ABOUTME: Chooses native or manual playback, owns image ids, and issues delete/replace commands

use crate::decode::FrameSequence;
use crate::error::PreviewError;
use crate::image_protocols::{ImageProtocol, InlineProtocol, protocol_for, sniff};
use crossterm::QueueableCommand;
use crossterm::cursor::{MoveTo, RestorePosition, SavePosition};
use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    /// The terminal loops the animation; redraws only reposition or re-send.
    Native,
    /// Frames are replaced client-side on a timer.
    Manual,
}

#[derive(Debug, Clone)]
struct Animation {
    id: u32,
    frames: Arc<FrameSequence>,
    raw: Arc<Vec<u8>>,
}

#[derive(Debug, Default)]
struct ManualClock {
    armed: bool,
    frame: usize,
    due: Option<Instant>,
}

pub struct AnimationDriver {
    protocol: Box<dyn ImageProtocol>,
    kind: InlineProtocol,
    software: bool,
    next_id: u32,
    current: Option<Animation>,
    mode: PlaybackMode,
    needs_retransmit: bool,
    dirty: bool,
    active_id: u32,
    manual: ManualClock,
    last_preview: (u16, u16),
    position: Option<(u16, u16)>,
}

impl AnimationDriver {
    pub fn new(kind: InlineProtocol, software: bool) -> Self {
        Self {
            protocol: protocol_for(kind),
            kind,
            software,
            next_id: 1,
            current: None,
            mode: PlaybackMode::Native,
            needs_retransmit: false,
            dirty: false,
            active_id: 0,
            manual: ManualClock::default(),
            last_preview: (0, 0),
            position: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.kind != InlineProtocol::None
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol.name()
    }

    /// Pixel size of the current animation.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.current
            .as_ref()
            .map(|anim| (anim.frames.width, anim.frames.height))
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Make `frames` the current animation under a fresh image id.
    ///
    /// The previous image is deleted on the next draw, right before the upload.
    pub fn set_animation(&mut self, frames: Arc<FrameSequence>, raw: Arc<Vec<u8>>) {
        let id = self.next_id;
        self.next_id += 1;
        self.mode = self.choose_mode(&frames, &raw);
        log::debug!(
            "preview image {} with {} frames, {:?} playback",
            id,
            frames.frames.len(),
            self.mode
        );
        self.current = Some(Animation { id, frames, raw });
        self.manual = ManualClock::default();
        self.needs_retransmit = true;
    }

    /// Forget the current animation. Its image is deleted by the next `hide`.
    pub fn clear_animation(&mut self) {
        self.current = None;
        self.manual = ManualClock::default();
        self.needs_retransmit = false;
    }

    /// iTerm-style terminals cannot render some sources from their raw bytes, so
    /// those always go through the re-encoded frames, even for a still image.
    fn choose_mode(&self, frames: &FrameSequence, raw: &[u8]) -> PlaybackMode {
        match self.kind {
            InlineProtocol::Iterm if !sniff::is_iterm_supported(raw) => PlaybackMode::Manual,
            _ if !frames.is_animated() => PlaybackMode::Native,
            InlineProtocol::Kitty if self.software => PlaybackMode::Manual,
            _ => PlaybackMode::Native,
        }
    }

    /// Force the next draw to redisplay the uploaded image.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Whether redisplay survives the surrounding text being redrawn.
    pub fn supports_placement(&self) -> bool {
        self.protocol.supports_placement()
    }

    /// Delete the image shown on screen, keeping the animation for a later draw.
    pub fn hide(&mut self, out: &mut dyn Write) -> io::Result<()> {
        if self.active_id != 0 {
            self.protocol.delete(out, self.active_id)?;
            self.active_id = 0;
        }
        if self.current.is_some() {
            self.needs_retransmit = true;
        }
        self.manual.armed = false;
        self.position = None;
        Ok(())
    }

    /// Draw the current animation into a `cols` by `rows` box at 0-based `(col, row)`.
    ///
    /// State only moves forward once the upload is written, so a failed draw is
    /// retried in full next time.
    pub fn draw(
        &mut self,
        out: &mut dyn Write,
        (col, row): (u16, u16),
        (cols, rows): (u16, u16),
        now: Instant,
    ) -> Result<(), PreviewError> {
        let Some(anim) = self.current.clone() else {
            return Ok(());
        };
        let Some(first) = anim.frames.frames.first() else {
            return Ok(());
        };
        self.position = Some((col, row));

        if self.needs_retransmit {
            if self.active_id != 0 {
                self.protocol.delete(out, self.active_id)?;
                self.active_id = 0;
            }
            match self.mode {
                PlaybackMode::Native => placed(out, (col, row), |out| {
                    self.protocol
                        .transmit_animation(out, anim.id, &anim.frames, &anim.raw, cols, rows)
                })?,
                PlaybackMode::Manual => placed(out, (col, row), |out| {
                    self.protocol.transmit(out, anim.id, &first.png, cols, rows)
                })?,
            }
            if self.mode == PlaybackMode::Manual {
                self.manual = ManualClock {
                    armed: true,
                    frame: 0,
                    due: Some(now + delay(first.delay_ms)),
                };
            }
            self.active_id = anim.id;
            self.needs_retransmit = false;
            self.dirty = false;
            self.last_preview = (cols, rows);
            return Ok(());
        }

        if self.dirty || self.last_preview != (cols, rows) {
            match self.mode {
                PlaybackMode::Manual => {
                    let frame = anim
                        .frames
                        .frames
                        .get(self.manual.frame)
                        .unwrap_or(first);
                    placed(out, (col, row), |out| {
                        self.protocol.transmit(out, anim.id, &frame.png, cols, rows)
                    })?;
                    self.manual.armed = true;
                    self.manual.due.get_or_insert(now + delay(frame.delay_ms));
                }
                PlaybackMode::Native if self.protocol.supports_placement() => {
                    placed(out, (col, row), |out| {
                        Ok(self.protocol.reposition(out, anim.id, cols, rows)?)
                    })?
                }
                PlaybackMode::Native => placed(out, (col, row), |out| {
                    self.protocol
                        .transmit_animation(out, anim.id, &anim.frames, &anim.raw, cols, rows)
                })?,
            }
            self.dirty = false;
            self.last_preview = (cols, rows);
        }
        Ok(())
    }

    /// Show the next manual frame once its due time has passed. Returns true if a frame was sent.
    pub fn advance(&mut self, out: &mut dyn Write, now: Instant) -> Result<bool, PreviewError> {
        if self.mode != PlaybackMode::Manual || !self.manual.armed {
            return Ok(false);
        }
        let Some(anim) = &self.current else {
            return Ok(false);
        };
        let count = anim.frames.frames.len();
        let (cols, rows) = self.last_preview;
        let (Some(position), Some(due)) = (self.position, self.manual.due) else {
            return Ok(false);
        };
        if count <= 1 || cols == 0 || rows == 0 || now < due {
            return Ok(false);
        }

        let index = (self.manual.frame + 1) % count;
        let frame = &anim.frames.frames[index];
        let next_due = now + delay(frame.delay_ms);
        let id = self.active_id;
        placed(out, position, |out| {
            self.protocol.transmit(out, id, &frame.png, cols, rows)
        })?;
        self.manual.frame = index;
        self.manual.due = Some(next_due);
        Ok(true)
    }

    pub fn clear_all(&mut self, out: &mut dyn Write) -> io::Result<()> {
        self.active_id = 0;
        self.protocol.clear_all(out)
    }
}

/// Run `send` with the cursor at `(col, row)`, restoring the cursor even when it fails.
fn placed(
    out: &mut dyn Write,
    (col, row): (u16, u16),
    send: impl FnOnce(&mut dyn Write) -> Result<(), PreviewError>,
) -> Result<(), PreviewError> {
    out.queue(SavePosition)?.queue(MoveTo(col, row))?;
    let sent = send(&mut *out);
    out.queue(RestorePosition)?;
    sent
}

fn delay(ms: u32) -> Duration {
    Duration::from_millis(u64::from(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Frame;
    use base64::{Engine, engine::general_purpose::STANDARD};

    fn sequence(delays: &[u32]) -> Arc<FrameSequence> {
        Arc::new(FrameSequence {
            frames: delays
                .iter()
                .enumerate()
                .map(|(i, delay_ms)| Frame {
                    png: vec![i as u8 + 1],
                    delay_ms: *delay_ms,
                })
                .collect(),
            width: 10,
            height: 10,
        })
    }

    fn gif_raw() -> Arc<Vec<u8>> {
        Arc::new(b"GIF89a\x0a\x00\x0a\x00".to_vec())
    }

    fn draw(driver: &mut AnimationDriver, now: Instant) -> String {
        let mut out = Vec::new();
        driver.draw(&mut out, (30, 3), (20, 10), now).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_mode_selection() {
        let mut kitty = AnimationDriver::new(InlineProtocol::Kitty, false);
        kitty.set_animation(sequence(&[50, 50]), gif_raw());
        assert_eq!(kitty.mode(), PlaybackMode::Native);

        let mut software = AnimationDriver::new(InlineProtocol::Kitty, true);
        software.set_animation(sequence(&[50, 50]), gif_raw());
        assert_eq!(software.mode(), PlaybackMode::Manual);
        software.set_animation(sequence(&[0]), gif_raw());
        assert_eq!(software.mode(), PlaybackMode::Native);

        let mut iterm = AnimationDriver::new(InlineProtocol::Iterm, false);
        iterm.set_animation(sequence(&[50, 50]), gif_raw());
        assert_eq!(iterm.mode(), PlaybackMode::Native);
        iterm.set_animation(sequence(&[50, 50]), Arc::new(b"RIFF....WEBP".to_vec()));
        assert_eq!(iterm.mode(), PlaybackMode::Manual);
    }

    #[test]
    fn test_selection_switch_deletes_before_transmit() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, false);
        driver.set_animation(sequence(&[50, 50]), gif_raw());
        let first = draw(&mut driver, now);
        assert!(first.contains("a=T,f=100,i=1,"));
        assert!(!first.contains("a=d"));

        driver.set_animation(sequence(&[50]), gif_raw());
        let second = draw(&mut driver, now);
        let delete = second.find("a=d,d=I,i=1,").unwrap();
        let transmit = second.find("a=T,f=100,i=2,").unwrap();
        assert!(delete < transmit);
        assert_eq!(second.matches("a=d").count(), 1);
        assert_eq!(second.matches("a=T").count(), 1);
        assert!(!second.contains("a=p"));
    }

    #[test]
    fn test_dirty_repositions_without_upload() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, false);
        driver.set_animation(sequence(&[50]), gif_raw());
        draw(&mut driver, now);

        assert_eq!(draw(&mut driver, now), "");
        driver.mark_dirty();
        let output = draw(&mut driver, now);
        assert!(output.contains("a=p,i=1,p=1,c=20,r=10"));
        assert!(!output.contains("a=T"));
    }

    #[test]
    fn test_iterm_dirty_resends_raw_bytes() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Iterm, false);
        driver.set_animation(sequence(&[50, 50]), gif_raw());
        assert!(draw(&mut driver, now).contains("\x1b]1337;File="));
        driver.mark_dirty();
        assert!(draw(&mut driver, now).contains("\x1b]1337;File="));
    }

    #[test]
    fn test_manual_advance_respects_due_time() {
        let start = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, true);
        driver.set_animation(sequence(&[100, 40, 70]), gif_raw());
        draw(&mut driver, start);

        let mut out = Vec::new();
        assert!(!driver.advance(&mut out, start + Duration::from_millis(99)).unwrap());
        assert!(out.is_empty());

        let t1 = start + Duration::from_millis(100);
        assert!(driver.advance(&mut out, t1).unwrap());
        let output = String::from_utf8(out.clone()).unwrap();
        assert!(output.starts_with("\x1b7\x1b[4;31H"));
        assert!(output.contains(&format!("i=1,p=1,c=20,r=10,C=1,q=2,m=0;{}", "Ag==")));
        assert!(output.ends_with("\x1b8"));

        // Rearmed with the displayed frame's own 40 ms delay
        out.clear();
        assert!(!driver.advance(&mut out, t1 + Duration::from_millis(39)).unwrap());
        assert!(driver.advance(&mut out, t1 + Duration::from_millis(40)).unwrap());
    }

    #[test]
    fn test_manual_advance_guards() {
        let now = Instant::now() + Duration::from_secs(60);
        let mut out = Vec::new();

        let mut idle = AnimationDriver::new(InlineProtocol::Kitty, true);
        assert!(!idle.advance(&mut out, now).unwrap());

        // Armed only after the first draw established a size and position
        let mut undrawn = AnimationDriver::new(InlineProtocol::Kitty, true);
        undrawn.set_animation(sequence(&[10, 10]), gif_raw());
        assert!(!undrawn.advance(&mut out, now).unwrap());

        let mut native = AnimationDriver::new(InlineProtocol::Kitty, false);
        native.set_animation(sequence(&[10, 10]), gif_raw());
        draw(&mut native, Instant::now());
        assert!(!native.advance(&mut out, now).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_hide_deletes_and_rearms_retransmit() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, true);
        driver.set_animation(sequence(&[10, 10]), gif_raw());
        draw(&mut driver, now);

        let mut out = Vec::new();
        driver.hide(&mut out).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "\x1b_Ga=d,d=I,i=1,q=2\x1b\\");
        assert!(!driver.advance(&mut out, now + Duration::from_secs(1)).unwrap());

        let output = draw(&mut driver, now);
        assert!(output.contains("a=T,f=100,i=1,"));
        assert!(!output.contains("a=d"));
    }

    #[test]
    fn test_clear_animation_then_hide() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, false);
        driver.set_animation(sequence(&[10]), gif_raw());
        draw(&mut driver, now);
        driver.clear_animation();
        assert!(driver.image_size().is_none());

        let mut out = Vec::new();
        driver.hide(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("a=d,d=I,i=1"));
        assert_eq!(draw(&mut driver, now), "");
    }

    const PNG_FRAME: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    fn still(png: &[u8]) -> Arc<FrameSequence> {
        Arc::new(FrameSequence {
            frames: vec![Frame {
                png: png.to_vec(),
                delay_ms: 100,
            }],
            width: 10,
            height: 10,
        })
    }

    #[test]
    fn test_iterm_still_from_unsupported_source_sends_frame_png() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Iterm, false);
        driver.set_animation(still(PNG_FRAME), Arc::new(b"BM\x3a\x00\x00\x00".to_vec()));
        assert_eq!(driver.mode(), PlaybackMode::Manual);

        let output = draw(&mut driver, now);
        assert!(output.starts_with("\x1b7\x1b[4;31H\x1b]1337;File="));
        assert!(output.contains(&format!("name={}", STANDARD.encode("thumb.png"))));
        assert!(output.contains(&STANDARD.encode(PNG_FRAME)));
        assert!(output.ends_with("\x1b8"));

        // A still image never advances
        let mut out = Vec::new();
        assert!(!driver.advance(&mut out, now + Duration::from_secs(5)).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn test_failed_upload_restores_cursor_and_retries() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Iterm, false);
        driver.set_animation(still(&[]), Arc::new(b"BM".to_vec()));

        let mut out = Vec::new();
        let err = driver.draw(&mut out, (0, 0), (20, 10), now).unwrap_err();
        assert!(matches!(err, PreviewError::EmptyPayload));
        assert_eq!(out, b"\x1b7\x1b[1;1H\x1b8");

        // Still pending, so the next draw tries the upload again
        out.clear();
        assert!(driver.draw(&mut out, (0, 0), (20, 10), now).is_err());
        assert_eq!(out, b"\x1b7\x1b[1;1H\x1b8");
    }

    #[test]
    fn test_failed_upload_does_not_claim_image_id() {
        let now = Instant::now();
        let mut driver = AnimationDriver::new(InlineProtocol::Kitty, true);
        driver.set_animation(sequence(&[10, 10]), gif_raw());
        draw(&mut driver, now);

        driver.set_animation(
            Arc::new(FrameSequence {
                frames: vec![
                    Frame {
                        png: Vec::new(),
                        delay_ms: 10,
                    },
                    Frame {
                        png: vec![1],
                        delay_ms: 10,
                    },
                ],
                width: 10,
                height: 10,
            }),
            gif_raw(),
        );
        let mut out = Vec::new();
        assert!(driver.draw(&mut out, (0, 0), (20, 10), now).is_err());
        let output = String::from_utf8(out).unwrap();
        assert!(output.starts_with("\x1b_Ga=d,d=I,i=1,q=2\x1b\\"));
        assert!(output.ends_with("\x1b8"));

        // Nothing was uploaded under id 2, so there is nothing to delete or animate
        let mut out = Vec::new();
        assert!(!driver.advance(&mut out, now + Duration::from_secs(1)).unwrap());
        driver.hide(&mut out).unwrap();
        assert!(out.is_empty());
    }
}
