//! Walk messages.

use crate::error::Result;
use crate::event::Event;
use crate::protocol::{BREAK_BYTE, PacketReader};
use crate::types::map::MAP_ITEM_SIZE;
use crate::types::{Direction, MapItem};

/// Walk/Reply: the server accepted our step.
///
/// ```text
/// 255 255 [uid:2 item:2 x:1 y:1 amount:3] × n
/// ```
///
/// Returns `None` if the packet does not open with two break bytes.
pub fn decode_main_player_walk(reader: &mut PacketReader<'_>) -> Result<Option<Event>> {
    if reader.get_byte()? != BREAK_BYTE || reader.get_byte()? != BREAK_BYTE {
        tracing::debug!("walk reply without item marker");
        return Ok(None);
    }

    // one char per byte, so the peeked tail measures the item block
    let count = reader.peek_end_string().chars().count() / MAP_ITEM_SIZE;
    let mut items = Vec::with_capacity(count);
    for _ in 0..count {
        items.push(MapItem {
            uid: reader.get_short()?,
            item_id: reader.get_short()?,
            x: reader.get_char()?,
            y: reader.get_char()?,
            amount: reader.get_three()?,
        });
    }

    Ok(Some(Event::MainPlayerWalk { items }))
}

/// Walk/Player: another player moved.
pub fn decode_other_player_walk(reader: &mut PacketReader<'_>) -> Result<Event> {
    Ok(Event::OtherPlayerWalk {
        player_id: reader.get_short()?,
        direction: Direction::from_byte(reader.get_char()?),
        x: reader.get_char()?,
        y: reader.get_char()?,
    })
}
