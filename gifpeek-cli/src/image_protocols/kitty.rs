// ABOUTME: Kitty terminal graphics protocol implementation
// ABOUTME: Handles base64 chunking, placements, deletes, and native frame animation

use super::ImageProtocol;
use crate::decode::FrameSequence;
use crate::error::PreviewError;
use base64::{Engine, engine::general_purpose::STANDARD};
use std::io::{self, Write};

/// Base64 bytes carried by one escape sequence.
const CHUNK_SIZE: usize = 4096;

/// Placement id reused for every image so repositioning replaces instead of stacking.
const PLACEMENT_ID: u32 = 1;

pub struct KittyProtocol;

impl KittyProtocol {
    /// Write `data` as base64 split across as many escape sequences as needed.
    ///
    /// Only the first sequence carries `control`; the rest carry just the `m` flag.
    fn write_chunked(out: &mut dyn Write, control: &str, data: &[u8]) -> io::Result<()> {
        let encoded = STANDARD.encode(data);
        let mut chunks = encoded.as_bytes().chunks(CHUNK_SIZE).peekable();
        let mut first = true;
        while let Some(chunk) = chunks.next() {
            let more = u8::from(chunks.peek().is_some());
            if first {
                write!(out, "\x1b_G{},m={};", control, more)?;
                first = false;
            } else {
                write!(out, "\x1b_Gm={};", more)?;
            }
            out.write_all(chunk)?;
            out.write_all(b"\x1b\\")?;
        }
        Ok(())
    }

    fn transmit_control(id: u32, cols: u16, rows: u16) -> String {
        format!(
            "a=T,f=100,i={},p={},c={},r={},C=1,q=2",
            id,
            PLACEMENT_ID,
            cols.max(1),
            rows.max(1)
        )
    }
}

impl ImageProtocol for KittyProtocol {
    fn name(&self) -> &'static str {
        "kitty"
    }

    /// `data` must be PNG; the terminal is told `f=100`.
    fn transmit(
        &self,
        out: &mut dyn Write,
        id: u32,
        data: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError> {
        if data.is_empty() {
            return Err(PreviewError::EmptyPayload);
        }
        Self::write_chunked(out, &Self::transmit_control(id, cols, rows), data)?;
        Ok(())
    }

    fn transmit_animation(
        &self,
        out: &mut dyn Write,
        id: u32,
        frames: &FrameSequence,
        _raw: &[u8],
        cols: u16,
        rows: u16,
    ) -> Result<(), PreviewError> {
        let (root, rest) = frames.frames.split_first().ok_or(PreviewError::NoFrames)?;
        self.transmit(out, id, &root.png, cols, rows)?;
        if rest.is_empty() {
            return Ok(());
        }

        write!(out, "\x1b_Ga=a,i={},r=1,z={},q=2\x1b\\", id, root.delay_ms)?;
        for frame in rest {
            let control = format!("a=f,i={},f=100,z={},q=2", id, frame.delay_ms);
            Self::write_chunked(out, &control, &frame.png)?;
        }
        // s=3 runs the animation, v=1 loops forever
        write!(out, "\x1b_Ga=a,i={},s=3,v=1,q=2\x1b\\", id)?;
        Ok(())
    }

    fn supports_placement(&self) -> bool {
        true
    }

    fn reposition(&self, out: &mut dyn Write, id: u32, cols: u16, rows: u16) -> io::Result<()> {
        write!(
            out,
            "\x1b_Ga=p,i={},p={},c={},r={},C=1,q=2\x1b\\",
            id,
            PLACEMENT_ID,
            cols.max(1),
            rows.max(1)
        )
    }

    fn delete(&self, out: &mut dyn Write, id: u32) -> io::Result<()> {
        write!(out, "\x1b_Ga=d,d=I,i={},q=2\x1b\\", id)
    }

    fn clear_all(&self, out: &mut dyn Write) -> io::Result<()> {
        out.write_all(b"\x1b_Ga=d,d=A,q=2\x1b\\")
    }
}
