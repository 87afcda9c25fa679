// ABOUTME: iTerm2 terminal inline image protocol implementation
// ABOUTME: Sends whole GIF/PNG/JPEG files as one OSC 1337 sequence; no placements

use super::ImageProtocol;
use super::sniff;
use crate::decode::FrameSequence;
use crate::error::PreviewError;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::io::{self, Write};

#[derive(Debug, Default, Clone, Copy)]
pub struct ITerm2Protocol {
    /// Fill the cell box exactly instead of preserving the image aspect ratio.
    pub stretch: bool,
}

impl ImageProtocol for ITerm2Protocol {
    fn name(&self) -> &'static str {
        "iTerm2"
    }

    fn transmit(
        &self,
        out: &mut dyn Write,
        _id: u32,
        data: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError> {
        if data.is_empty() {
            return Err(PreviewError::EmptyPayload);
        }
        if !sniff::is_iterm_supported(data) {
            return Err(PreviewError::UnsupportedFormat {
                protocol: self.name(),
            });
        }

        // ESC ] 1337 ; File=name=<b64>;size=<n>;width=<c>;height=<r>;
        //     preserveAspectRatio=<0|1>;inline=1:<b64> BEL
        write!(
            out,
            "\x1b]1337;File=name={};size={};width={};height={};preserveAspectRatio={};inline=1:{}\x07",
            STANDARD.encode(sniff::inline_name(data)),
            data.len(),
            cols.max(1),
            rows.max(1),
            u8::from(!self.stretch),
            STANDARD.encode(data)
        )?;
        Ok(())
    }

    /// The terminal animates GIF bytes itself, so the raw source is sent as-is.
    fn transmit_animation(
        &self,
        out: &mut dyn Write,
        id: u32,
        _frames: &FrameSequence,
        raw: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError> {
        self.transmit(out, id, raw, cols, rows)
    }

    fn supports_placement(&self) -> bool {
        false
    }

    fn reposition(&self, _out: &mut dyn Write, _id: u32, _cols: u16, _rows: u16) -> io::Result<()> {
        Ok(())
    }

    fn delete(&self, _out: &mut dyn Write, _id: u32) -> io::Result<()> {
        Ok(())
    }

    fn clear_all(&self, _out: &mut dyn Write) -> io::Result<()> {
        Ok(())
    }
}
