// Error types for the tag and duration readers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised inside a single format reader.
///
/// None of these escape [`crate::parse`] or [`crate::estimate_duration`]:
/// the engine logs them and moves on to the next reader or stage.
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A read wanted more bytes than the source has left
    #[error("unexpected end of data at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },

    /// Absolute seek beyond the end of the source
    #[error("seek to offset {offset} is past the end of data ({len} bytes)")]
    SeekOutOfBounds { offset: u64, len: u64 },

    /// Path does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Failure reported by the decoding subsystem
    #[error("decoder error: {0}")]
    Symphonia(#[from] symphonia::core::errors::Error),
}
