//! Map entities.

/// Encoded size of one map item entry.
pub const MAP_ITEM_SIZE: usize = 9;

/// An item stack lying on a map tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MapItem {
    /// Server-assigned instance ID.
    pub uid: u16,
    /// Item definition ID (see the item file).
    pub item_id: u16,
    pub x: u8,
    pub y: u8,
    pub amount: u32,
}
