// ABOUTME: Image protocol implementations for terminal inline image display
// ABOUTME: Strategy trait over kitty-style, iTerm-style, and no-image terminals

use crate::decode::FrameSequence;
use crate::error::PreviewError;
use std::io::{self, Write};

pub mod detection;
pub mod iterm2;
pub mod kitty;
pub mod sniff;

pub use detection::{ColorChoice, InlineProtocol, TerminalCapabilities, ThumbsMode};
pub use iterm2::ITerm2Protocol;
pub use kitty::KittyProtocol;

/// Serializes images into the byte stream a terminal expects.
///
/// Images are addressed by a caller-assigned numeric id. Placement happens at
/// the cursor position current when `transmit` runs.
pub trait ImageProtocol: Send + Sync {
    fn name(&self) -> &'static str;

    /// Upload and display a single still image.
    fn transmit(
        &self,
        out: &mut dyn Write,
        id: u32,
        data: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError>;

    /// Upload an animation the terminal loops by itself.
    fn transmit_animation(
        &self,
        out: &mut dyn Write,
        id: u32,
        frames: &FrameSequence,
        raw: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError>;

    /// Whether an uploaded image can be moved without re-sending its data.
    fn supports_placement(&self) -> bool;

    fn reposition(&self, out: &mut dyn Write, id: u32, cols: u16, rows: u16) -> io::Result<()>;

    /// Remove one image. Unknown ids are ignored by the terminal.
    fn delete(&self, out: &mut dyn Write, id: u32) -> io::Result<()>;

    fn clear_all(&self, out: &mut dyn Write) -> io::Result<()>;
}

/// Used when the terminal speaks neither protocol.
pub struct NoImages;

impl ImageProtocol for NoImages {
    fn name(&self) -> &'static str {
        "none"
    }

    fn transmit(
        &self,
        _: &mut dyn Write,
        _: u32,
        _: &[u8],
        _: u16,
        _: u16,
    ) -> Result<(), PreviewError> {
        Err(PreviewError::NoProtocol)
    }

    fn transmit_animation(
        &self,
        _: &mut dyn Write,
        _: u32,
        _: &FrameSequence,
        _: &[u8],
        _: u16,
        _: u16,
    ) -> Result<(), PreviewError> {
        Err(PreviewError::NoProtocol)
    }

    fn supports_placement(&self) -> bool {
        false
    }

    fn reposition(&self, _: &mut dyn Write, _: u32, _: u16, _: u16) -> io::Result<()> {
        Ok(())
    }

    fn delete(&self, _: &mut dyn Write, _: u32) -> io::Result<()> {
        Ok(())
    }

    fn clear_all(&self, _: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}

pub fn protocol_for(kind: InlineProtocol) -> Box<dyn ImageProtocol> {
    match kind {
        InlineProtocol::Kitty => Box::new(KittyProtocol),
        InlineProtocol::Iterm => Box::new(ITerm2Protocol::default()),
        InlineProtocol::None => Box::new(NoImages),
    }
}
