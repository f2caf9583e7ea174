//! Outbound packet construction and inbound packet parsing.
//!
//! ```text
//! ┌──────────┬──────────┬──────────────────────────────┐
//! │  family  │  action  │  payload fields …            │
//! │  1 digit │  1 digit │  fixed per-message order     │
//! └──────────┴──────────┴──────────────────────────────┘
//! ```
//!
//! [`PacketBuilder`] only appends. [`PacketReader`] only consumes. The two never
//! share a buffer.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::CodecError;
use crate::protocol::family::{FamilyActionPair, PacketAction, PacketFamily};
use crate::protocol::number::{self, BREAK_BYTE};

/// Size of the family/action header.
pub const HEADER_SIZE: usize = 2;

/// Builds an outbound packet by sequential appends.
#[derive(Debug, Clone)]
pub struct PacketBuilder {
    family: PacketFamily,
    action: PacketAction,
    buf: BytesMut,
}

impl PacketBuilder {
    /// Creates a builder with the header already written.
    #[must_use]
    pub fn new(family: PacketFamily, action: PacketAction) -> Self {
        let mut buf = BytesMut::with_capacity(16);
        number::put_number(&mut buf, u32::from(u8::from(family)), 1);
        number::put_number(&mut buf, u32::from(u8::from(action)), 1);
        Self {
            family,
            action,
            buf,
        }
    }

    #[must_use]
    pub const fn family(&self) -> PacketFamily {
        self.family
    }

    #[must_use]
    pub const fn action(&self) -> PacketAction {
        self.action
    }

    /// Total length including the header.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing but the header has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.len() == HEADER_SIZE
    }

    /// Appends a raw byte.
    pub fn add_byte(&mut self, value: u8) -> &mut Self {
        self.buf.put_u8(value);
        self
    }

    /// Appends a 1-byte encoded number.
    pub fn add_char(&mut self, value: u8) -> &mut Self {
        number::put_number(&mut self.buf, u32::from(value), 1);
        self
    }

    /// Appends a 2-byte encoded number.
    pub fn add_short(&mut self, value: u16) -> &mut Self {
        number::put_number(&mut self.buf, u32::from(value), 2);
        self
    }

    /// Appends a 3-byte encoded number.
    pub fn add_three(&mut self, value: u32) -> &mut Self {
        number::put_number(&mut self.buf, value, 3);
        self
    }

    /// Appends a 4-byte encoded number.
    pub fn add_int(&mut self, value: u32) -> &mut Self {
        number::put_number(&mut self.buf, value, 4);
        self
    }

    /// Appends a string without any length prefix.
    ///
    /// Wire strings are single-byte; characters above U+00FF become `?`.
    pub fn add_string(&mut self, value: &str) -> &mut Self {
        for c in value.chars() {
            self.buf.put_u8(u8::try_from(c).unwrap_or(b'?'));
        }
        self
    }

    /// Appends the break byte separating variable-length fields.
    pub fn add_break(&mut self) -> &mut Self {
        self.buf.put_u8(BREAK_BYTE);
        self
    }

    /// Finishes the packet.
    #[must_use]
    pub fn build(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Sequential reader over a received packet.
///
/// The header is decoded on construction; the cursor starts at the first
/// payload byte. A failed read leaves the cursor where it was.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    family_id: u8,
    action_id: u8,
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Wraps a complete packet and decodes its header.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::BufferUnderrun`] if `data` is shorter than the
    /// header, or [`CodecError::MalformedInput`] if a header byte is `0`.
    pub fn new(data: &'a [u8]) -> Result<Self, CodecError> {
        if data.len() < HEADER_SIZE {
            return Err(CodecError::BufferUnderrun {
                needed: HEADER_SIZE,
                remaining: data.len(),
            });
        }
        let family_id = number::decode(&data[..1])? as u8;
        let action_id = number::decode(&data[1..2]).map_err(|e| match e {
            CodecError::MalformedInput { byte, .. } => {
                CodecError::MalformedInput { byte, position: 1 }
            }
            other => other,
        })? as u8;

        Ok(Self {
            data,
            family_id,
            action_id,
            pos: HEADER_SIZE,
        })
    }

    /// Raw family identifier from the header.
    #[must_use]
    pub const fn family_id(&self) -> u8 {
        self.family_id
    }

    /// Raw action identifier from the header.
    #[must_use]
    pub const fn action_id(&self) -> u8 {
        self.action_id
    }

    #[must_use]
    pub const fn family(&self) -> Option<PacketFamily> {
        PacketFamily::from_byte(self.family_id)
    }

    #[must_use]
    pub const fn action(&self) -> Option<PacketAction> {
        PacketAction::from_byte(self.action_id)
    }

    /// Returns the routing key, if both identifiers are known.
    #[must_use]
    pub const fn pair(&self) -> Option<FamilyActionPair> {
        match (self.family(), self.action()) {
            (Some(family), Some(action)) => Some(FamilyActionPair::new(family, action)),
            _ => None,
        }
    }

    /// The whole packet, header included.
    #[must_use]
    pub const fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Total length including the header.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the packet has no payload.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.len() == HEADER_SIZE
    }

    /// Cursor position, counted from the start of the packet.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Moves the cursor to an absolute position (header bytes count).
    pub fn seek(&mut self, pos: usize) -> Result<(), CodecError> {
        if pos > self.data.len() {
            return Err(CodecError::BufferUnderrun {
                needed: pos - self.pos,
                remaining: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Skips `count` bytes.
    pub fn skip(&mut self, count: usize) -> Result<(), CodecError> {
        self.take(count).map(|_| ())
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(CodecError::BufferUnderrun {
                needed: count,
                remaining,
            });
        }
        let data = self.data;
        let slice = &data[self.pos..self.pos + count];
        self.pos += count;
        Ok(slice)
    }

    fn take_number(&mut self, width: usize) -> Result<u32, CodecError> {
        let start = self.pos;
        let bytes = self.take(width)?;
        number::decode(bytes).map_err(|e| {
            self.pos = start;
            match e {
                CodecError::MalformedInput { byte, position } => CodecError::MalformedInput {
                    byte,
                    position: start + position,
                },
                other => other,
            }
        })
    }

    /// Reads a raw byte.
    pub fn get_byte(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Returns the next raw byte without consuming it.
    pub fn peek_byte(&self) -> Result<u8, CodecError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(CodecError::BufferUnderrun {
                needed: 1,
                remaining: 0,
            })
    }

    /// Reads a 1-byte encoded number.
    pub fn get_char(&mut self) -> Result<u8, CodecError> {
        self.take_number(1).map(|v| v as u8)
    }

    /// Reads a 2-byte encoded number.
    pub fn get_short(&mut self) -> Result<u16, CodecError> {
        self.take_number(2).map(|v| v as u16)
    }

    /// Reads a 3-byte encoded number.
    pub fn get_three(&mut self) -> Result<u32, CodecError> {
        self.take_number(3)
    }

    /// Reads a 4-byte encoded number.
    pub fn get_int(&mut self) -> Result<u32, CodecError> {
        self.take_number(4)
    }

    /// Reads exactly `len` bytes as a string.
    pub fn get_fixed_string(&mut self, len: usize) -> Result<String, CodecError> {
        self.take(len).map(latin1)
    }

    /// Reads up to the next break byte and consumes the break.
    ///
    /// Without a break the rest of the packet is returned.
    pub fn get_break_string(&mut self) -> Result<String, CodecError> {
        let rest = self.peek_end_bytes();
        match rest.iter().position(|&b| b == BREAK_BYTE) {
            Some(idx) => {
                let s = latin1(&rest[..idx]);
                self.pos += idx + 1;
                Ok(s)
            }
            None => Ok(self.get_end_string()),
        }
    }

    /// Consumes every remaining byte as a string.
    pub fn get_end_string(&mut self) -> String {
        let s = self.peek_end_string();
        self.pos = self.data.len();
        s
    }

    /// Returns the remaining bytes as a string without moving the cursor.
    #[must_use]
    pub fn peek_end_string(&self) -> String {
        latin1(self.peek_end_bytes())
    }

    /// Returns the remaining bytes without moving the cursor.
    #[must_use]
    pub fn peek_end_bytes(&self) -> &'a [u8] {
        let data = self.data;
        &data[self.pos..]
    }
}

/// Wire strings are single-byte; map each byte to the same code point.
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
