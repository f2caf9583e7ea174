//! Face, attack and talk messages from other players.

use crate::error::Result;
use crate::event::Event;
use crate::protocol::PacketReader;
use crate::types::Direction;

/// Face/Player: `id:2 direction:1`.
pub fn decode_player_face(reader: &mut PacketReader<'_>) -> Result<Event> {
    Ok(Event::PlayerFace {
        player_id: reader.get_short()?,
        direction: Direction::from_byte(reader.get_char()?),
    })
}

/// Attack/Player: `id:2 direction:1`.
pub fn decode_other_player_attack(reader: &mut PacketReader<'_>) -> Result<Event> {
    Ok(Event::OtherPlayerAttack {
        player_id: reader.get_short()?,
        direction: Direction::from_byte(reader.get_char()?),
    })
}

/// Talk/Player: `id:2 message...`.
pub fn decode_player_chat(reader: &mut PacketReader<'_>) -> Result<Event> {
    Ok(Event::PlayerChat {
        player_id: reader.get_short()?,
        message: reader.get_end_string(),
    })
}
