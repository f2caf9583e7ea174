//! Built-in packet handlers.
//!
//! Each decoder turns one (family, action) payload into an [`Event`]. The
//! registration helpers wire them into a [`DispatchTable`] so that decoded
//! events land on an [`EventDispatcher`].

pub mod player;
pub mod walk;

use crate::dispatch::DispatchTable;
use crate::error::Result;
use crate::event::{Event, EventDispatcher};
use crate::protocol::{PacketAction, PacketFamily, PacketReader};

/// Registers `decode` for a pair, publishing whatever it decodes.
pub fn register_event_handler<F>(
    table: &mut DispatchTable,
    events: &EventDispatcher,
    family: PacketFamily,
    action: PacketAction,
    requires_initialized: bool,
    decode: F,
) -> bool
where
    F: Fn(&mut PacketReader<'_>) -> Result<Option<Event>> + Send + Sync + 'static,
{
    let events = events.clone();
    table.register(family, action, requires_initialized, move |reader| {
        if let Some(event) = decode(reader)? {
            events.dispatch(event);
        }
        Ok(())
    })
}

/// Registers every built-in handler.
///
/// All of them require an initialized session.
pub fn register_default_handlers(table: &mut DispatchTable, events: &EventDispatcher) {
    register_event_handler(
        table,
        events,
        PacketFamily::Walk,
        PacketAction::Reply,
        true,
        walk::decode_main_player_walk,
    );
    register_event_handler(
        table,
        events,
        PacketFamily::Walk,
        PacketAction::Player,
        true,
        |r| walk::decode_other_player_walk(r).map(Some),
    );
    register_event_handler(
        table,
        events,
        PacketFamily::Face,
        PacketAction::Player,
        true,
        |r| player::decode_player_face(r).map(Some),
    );
    register_event_handler(
        table,
        events,
        PacketFamily::Attack,
        PacketAction::Player,
        true,
        |r| player::decode_other_player_attack(r).map(Some),
    );
    register_event_handler(
        table,
        events,
        PacketFamily::Talk,
        PacketAction::Player,
        true,
        |r| player::decode_player_chat(r).map(Some),
    );
}
