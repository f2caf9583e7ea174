//! Shared record layout for the game data files.
//!
//! Every record has the same shape:
//! ```text
//! ┌───────────────────┬──────────────────┬──────────────────────────┐
//! │ name lengths      │ name bytes       │ fixed field block        │
//! │ 1 byte per name   │ Σ name lengths   │ DATA_SIZE bytes          │
//! └───────────────────┴──────────────────┴──────────────────────────┘
//! ```
//! Field offsets are relative to the start of the fixed block. Positions no
//! field covers hold [`FILL_BYTE`].

use std::fmt;

use crate::error::{CodecError, Result};
use crate::protocol::number::{self, FILL_BYTE, ONE_BYTE_MAX};

/// Longest name a single length byte can describe.
pub const MAX_NAME_LEN: usize = ONE_BYTE_MAX as usize - 1;

/// The four record families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Item,
    Npc,
    Class,
    Spell,
}

impl RecordKind {
    /// The 3-byte marker that opens a data file of this kind.
    #[must_use]
    pub const fn marker(self) -> &'static [u8; 3] {
        match self {
            Self::Item => b"EIF",
            Self::Npc => b"ENF",
            Self::Class => b"ECF",
            Self::Spell => b"ESF",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Item => "item",
            Self::Npc => "npc",
            Self::Class => "class",
            Self::Spell => "spell",
        };
        f.write_str(name)
    }
}

/// A record stored in one of the game data files.
pub trait DataRecord: Sized {
    /// Which file family the record belongs to.
    const KIND: RecordKind;

    /// Size of the fixed field block.
    const DATA_SIZE: usize;

    /// Number of length-prefixed names before the field block.
    const NAME_COUNT: usize;

    /// 1-based position of the record in its file.
    fn id(&self) -> u32;

    /// Names in file order.
    fn names(&self) -> Vec<&str>;

    /// Returns true if `version` has an offset table.
    fn supports_version(version: u8) -> bool;

    /// Builds a record from its names and fixed field block.
    ///
    /// `names` holds exactly `NAME_COUNT` entries. Fields past the end of a
    /// short `fields` slice keep their zero default.
    fn deserialize(id: u32, names: Vec<String>, version: u8, fields: &[u8]) -> Result<Self>;

    /// Writes every field at its offset.
    fn write_fields(&self, block: &mut FieldBlock);

    /// Serializes the name block followed by the field block.
    ///
    /// Names longer than [`MAX_NAME_LEN`] are truncated.
    fn to_bytes(&self) -> Vec<u8> {
        let names: Vec<Vec<u8>> = self.names().into_iter().map(name_bytes).collect();
        let name_total: usize = names.iter().map(Vec::len).sum();

        let mut out = Vec::with_capacity(Self::NAME_COUNT + name_total + Self::DATA_SIZE);
        for name in &names {
            out.push(number::encode(name.len() as u32, 1)[0]);
        }
        for name in &names {
            out.extend_from_slice(name);
        }

        let mut block = FieldBlock::new(Self::DATA_SIZE);
        self.write_fields(&mut block);
        out.extend_from_slice(block.as_bytes());
        out
    }

    /// Parses a record produced by [`DataRecord::to_bytes`].
    fn from_bytes(id: u32, version: u8, raw: &[u8]) -> Result<Self> {
        let (names, consumed) = read_names(raw, Self::NAME_COUNT)?;
        let rest = &raw[consumed..];
        let fields = &rest[..rest.len().min(Self::DATA_SIZE)];
        Self::deserialize(id, names, version, fields)
    }
}

/// Reads `count` length-prefixed names from the start of `raw`.
///
/// Returns the names and the number of bytes consumed.
pub(crate) fn read_names(
    raw: &[u8],
    count: usize,
) -> std::result::Result<(Vec<String>, usize), CodecError> {
    if raw.len() < count {
        return Err(CodecError::BufferUnderrun {
            needed: count,
            remaining: raw.len(),
        });
    }

    let mut lengths = Vec::with_capacity(count);
    for (position, &byte) in raw[..count].iter().enumerate() {
        let len = number::decode(&[byte]).map_err(|_| CodecError::MalformedInput {
            byte,
            position,
        })?;
        lengths.push(len as usize);
    }

    let mut pos = count;
    let mut names = Vec::with_capacity(count);
    for len in lengths {
        let Some(bytes) = raw.get(pos..pos + len) else {
            return Err(CodecError::BufferUnderrun {
                needed: len,
                remaining: raw.len() - pos,
            });
        };
        names.push(bytes.iter().copied().map(char::from).collect());
        pos += len;
    }

    Ok((names, pos))
}

/// Names are single-byte strings; characters outside that range become `?`.
fn name_bytes(name: &str) -> Vec<u8> {
    name.chars()
        .map(|c| u8::try_from(c).unwrap_or(b'?'))
        .take(MAX_NAME_LEN)
        .collect()
}

/// Writable fixed field block, pre-filled with [`FILL_BYTE`].
#[derive(Debug, Clone)]
pub struct FieldBlock {
    bytes: Vec<u8>,
}

impl FieldBlock {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            bytes: vec![FILL_BYTE; size],
        }
    }

    /// Encodes `value` at `offset`, truncating to `width` digits.
    ///
    /// # Panics
    ///
    /// Panics if the field does not fit in the block.
    pub fn put(&mut self, offset: usize, value: u32, width: usize) {
        self.bytes[offset..offset + width].copy_from_slice(&number::encode(value, width));
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Read-only view of a fixed field block.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    data: &'a [u8],
}

impl<'a> Fields<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Decodes the number at `offset`, or 0 if the block ends before it.
    pub fn number(&self, offset: usize, width: usize) -> std::result::Result<u32, CodecError> {
        match self.data.get(offset..offset + width) {
            Some(bytes) => number::decode(bytes).map_err(|e| match e {
                CodecError::MalformedInput { byte, position } => CodecError::MalformedInput {
                    byte,
                    position: offset + position,
                },
                other => other,
            }),
            None => Ok(0),
        }
    }

    pub fn char(&self, offset: usize) -> std::result::Result<u8, CodecError> {
        self.number(offset, 1).map(|v| v as u8)
    }

    pub fn short(&self, offset: usize) -> std::result::Result<u16, CodecError> {
        self.number(offset, 2).map(|v| v as u16)
    }

    pub fn three(&self, offset: usize) -> std::result::Result<u32, CodecError> {
        self.number(offset, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_block_fill() {
        let mut block = FieldBlock::new(4);
        block.put(1, 0, 2);
        assert_eq!(block.as_bytes(), &[FILL_BYTE, 1, 1, FILL_BYTE]);
    }

    #[test]
    fn test_fields_missing_offset_is_zero() {
        let data = [11, 1, 21];
        let fields = Fields::new(&data);
        assert_eq!(fields.char(0).unwrap(), 10);
        assert_eq!(fields.short(1).unwrap(), 20);
        assert_eq!(fields.short(2).unwrap(), 0);
        assert_eq!(fields.three(10).unwrap(), 0);
    }

    #[test]
    fn test_fields_reports_block_offset() {
        let data = [1, 1, 1, 0];
        let fields = Fields::new(&data);
        assert_eq!(
            fields.short(2),
            Err(CodecError::MalformedInput {
                byte: 0,
                position: 3
            })
        );
    }

    #[test]
    fn test_read_names() {
        let raw = [4, 3, b'a', b'b', b'c', b'x', b'y', 99];
        let (names, consumed) = read_names(&raw, 2).unwrap();
        assert_eq!(names, vec!["abc".to_string(), "xy".to_string()]);
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_read_names_truncated() {
        let raw = [6, b'a'];
        assert!(matches!(
            read_names(&raw, 1),
            Err(CodecError::BufferUnderrun { needed: 5, .. })
        ));
        assert!(read_names(&[0, b'a'], 1).is_err());
    }

    #[test]
    fn test_name_bytes() {
        assert_eq!(name_bytes("Gun"), b"Gun".to_vec());
        assert_eq!(name_bytes("é"), vec![0xE9]);
        assert_eq!(name_bytes("日"), vec![b'?']);
        assert_eq!(name_bytes(&"a".repeat(300)).len(), MAX_NAME_LEN);
    }

    #[test]
    fn test_marker() {
        assert_eq!(RecordKind::Item.marker(), b"EIF");
        assert_eq!(RecordKind::Spell.to_string(), "spell");
    }
}
