//! Wire protocol definitions.
//!
//! This module contains the low-level protocol types including:
//! - Base-253 number encoding
//! - Packet family/action identifiers
//! - Packet building and reading
//! - Stream framing

pub mod family;
pub mod frame;
pub mod number;
pub mod packet;

pub use family::{FamilyActionPair, PacketAction, PacketFamily};
pub use frame::{FrameDecoder, MAX_FRAME_SIZE, encode as encode_frame};
pub use number::{BREAK_BYTE, FILL_BYTE};
pub use packet::{HEADER_SIZE, PacketBuilder, PacketReader};
