//! Error types for the eocodec library.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::RecordKind;

/// The main error type for eocodec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Number or packet decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// Frame encoding/decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// Record or data file version is not understood by this library.
    #[error("unsupported {kind} version: {version}")]
    UnsupportedVersion { kind: RecordKind, version: u8 },

    /// A data file could not be read or its header is invalid.
    #[error("failed to load {}: {reason}", path.display())]
    FileLoad { path: PathBuf, reason: String },

    /// Connection is not established.
    #[error("not connected")]
    NotConnected,

    /// The session has not completed its initialization handshake.
    #[error("session not initialized")]
    NotInitialized,

    /// Handlers can only be registered while no session is running.
    #[error("cannot modify handlers while a session is active")]
    SessionActive,

    /// Connection attempt timed out.
    #[error("connection timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Channel receive error.
    #[error("channel closed")]
    ChannelClosed,
}

/// Errors produced while decoding numbers and packet fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A byte that can never appear in an encoded number.
    #[error("malformed input: byte {byte} at position {position}")]
    MalformedInput { byte: u8, position: usize },

    /// Encoded numbers are 1 to 4 bytes wide.
    #[error("invalid number width: {0}")]
    InvalidWidth(usize),

    /// Attempted to read past the end of the buffer.
    #[error("buffer underrun: need {needed} bytes, {remaining} remaining")]
    BufferUnderrun { needed: usize, remaining: usize },
}

/// Frame-specific errors.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Frame payload exceeds maximum size.
    #[error("frame too large: {size} bytes exceeds maximum {max}")]
    TooLarge { size: usize, max: usize },

    /// The length prefix is not a valid encoded number.
    #[error("invalid length prefix: {0}")]
    InvalidLength(#[source] CodecError),
}

/// Result type alias for eocodec operations.
pub type Result<T> = std::result::Result<T, Error>;
