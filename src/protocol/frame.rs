//! Length-prefixed framing used by the stream transport.
//!
//! Each packet on the wire is preceded by its length as a 2-byte encoded number:
//! ```text
//! ┌──────────────────┬─────────────────┐
//! │  length (digits) │    packet       │
//! │  2 bytes         │  length bytes   │
//! └──────────────────┴─────────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;
use crate::protocol::number::{self, TWO_BYTE_MAX};

/// Size of the length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 2;

/// Largest packet a 2-digit length can describe.
pub const MAX_FRAME_SIZE: usize = TWO_BYTE_MAX as usize - 1;

/// Prefixes a packet with its encoded length.
///
/// # Panics
///
/// Panics if the packet exceeds `MAX_FRAME_SIZE`.
#[must_use]
pub fn encode(packet: &[u8]) -> Bytes {
    assert!(
        packet.len() <= MAX_FRAME_SIZE,
        "packet exceeds maximum frame size"
    );

    let mut buf = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + packet.len());
    number::put_number(&mut buf, packet.len() as u32, LENGTH_PREFIX_SIZE);
    buf.put_slice(packet);
    buf.freeze()
}

/// Frame decoder that handles partial and batched reads.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Creates a new frame decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Feeds data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next complete frame.
    ///
    /// Returns `Ok(Some(packet))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or an error if the length prefix is
    /// invalid. After an error the buffer is cleared; the stream has lost sync
    /// and nothing after the bad prefix can be trusted.
    pub fn decode(&mut self) -> Result<Option<Bytes>, FrameError> {
        if self.buffer.len() < LENGTH_PREFIX_SIZE {
            return Ok(None);
        }

        let length = match number::decode(&self.buffer[..LENGTH_PREFIX_SIZE]) {
            Ok(length) => length as usize,
            Err(e) => {
                self.buffer.clear();
                return Err(FrameError::InvalidLength(e));
            }
        };

        if length > MAX_FRAME_SIZE {
            self.buffer.clear();
            return Err(FrameError::TooLarge {
                size: length,
                max: MAX_FRAME_SIZE,
            });
        }

        if self.buffer.len() < LENGTH_PREFIX_SIZE + length {
            return Ok(None);
        }

        self.buffer.advance(LENGTH_PREFIX_SIZE);
        Ok(Some(self.buffer.split_to(length).freeze()))
    }

    /// Returns the number of bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
