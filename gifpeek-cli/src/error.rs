// ABOUTME: Error taxonomy for preview rendering and interactive terminal sessions
// ABOUTME: Decode/protocol failures degrade output; session failures are fatal at startup

use gifpeek_sdk::GifError;
use std::io;
use thiserror::Error;

/// Failures on the image path: fetch, decode, or encode for a protocol.
///
/// Callers degrade on every variant (text fallback or no preview update).
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Image format not supported by the {protocol} protocol")]
    UnsupportedFormat { protocol: &'static str },

    #[error("Empty image payload")]
    EmptyPayload,

    #[error("No frames decoded")]
    NoFrames,

    #[error("Inline images not supported by this terminal")]
    NoProtocol,

    #[error(transparent)]
    Fetch(#[from] GifError),

    #[error("Terminal write failed: {0}")]
    Io(#[from] io::Error),
}

impl From<image::ImageError> for PreviewError {
    fn from(err: image::ImageError) -> Self {
        PreviewError::Decode(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("stdin is not a tty")]
    NotTerminal,

    #[error("Failed to enter raw mode: {0}")]
    RawMode(io::Error),

    #[error("Failed to read terminal size: {0}")]
    Size(io::Error),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}
