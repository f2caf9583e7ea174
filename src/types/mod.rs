//! Game-state values carried by packets.
//!
//! - Facing directions
//! - Items lying on the map

pub mod direction;
pub mod map;

pub use direction::Direction;
pub use map::MapItem;
