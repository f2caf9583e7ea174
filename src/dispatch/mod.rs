//! Routing of inbound packets to handlers.
//!
//! Each (family, action) pair maps to exactly one handler. A handler decodes
//! the payload and usually publishes an [`Event`](crate::event::Event); it
//! never talks back to the transport.
//!
//! ```text
//! bytes ─► PacketReader ─► pair ─► DispatchTable ─► handler(reader)
//!                                     │
//!                                     └─ no handler / not initialized: dropped
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::protocol::{FamilyActionPair, PacketAction, PacketFamily, PacketReader};

/// A packet handler.
///
/// Handlers run on the packet processing task and must not block.
pub type Handler = Box<dyn Fn(&mut PacketReader<'_>) -> Result<()> + Send + Sync>;

/// Connection-scoped state consulted by the dispatcher.
#[derive(Debug, Default)]
pub struct SessionState {
    initialized: AtomicBool,
    player_id: AtomicU16,
}

impl SessionState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            player_id: AtomicU16::new(0),
        }
    }

    /// Returns true once the login handshake has completed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn set_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::Release);
    }

    /// The local player's ID, if one has been assigned.
    #[must_use]
    pub fn player_id(&self) -> Option<u16> {
        match self.player_id.load(Ordering::Acquire) {
            0 => None,
            id => Some(id),
        }
    }

    pub fn set_player_id(&self, id: u16) {
        self.player_id.store(id, Ordering::Release);
    }

    /// Returns to the state of a fresh connection.
    pub fn reset(&self) {
        self.set_initialized(false);
        self.player_id.store(0, Ordering::Release);
    }
}

/// Result of routing one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran to completion.
    Handled,
    /// No handler is registered for the pair.
    Unhandled,
    /// The handler requires an initialized session and there is none.
    Suppressed,
    /// The packet could not be decoded and was dropped.
    Failed,
}

struct Entry {
    requires_initialized: bool,
    handler: Handler,
}

/// Map from (family, action) to handler.
#[derive(Default)]
pub struct DispatchTable {
    entries: HashMap<FamilyActionPair, Entry>,
}

impl DispatchTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for a pair.
    ///
    /// Returns true if an existing handler was replaced.
    pub fn register<F>(
        &mut self,
        family: PacketFamily,
        action: PacketAction,
        requires_initialized: bool,
        handler: F,
    ) -> bool
    where
        F: Fn(&mut PacketReader<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let pair = FamilyActionPair::new(family, action);
        let entry = Entry {
            requires_initialized,
            handler: Box::new(handler),
        };
        let replaced = self.entries.insert(pair, entry).is_some();
        if replaced {
            warn!("replaced existing handler for {}", pair);
        }
        replaced
    }

    /// Removes the handler for a pair. Returns true if one was registered.
    pub fn unregister(&mut self, family: PacketFamily, action: PacketAction) -> bool {
        self.entries
            .remove(&FamilyActionPair::new(family, action))
            .is_some()
    }

    #[must_use]
    pub fn contains(&self, family: PacketFamily, action: PacketAction) -> bool {
        self.entries
            .contains_key(&FamilyActionPair::new(family, action))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes a parsed packet to its handler.
    pub fn dispatch(&self, session: &SessionState, reader: &mut PacketReader<'_>) -> DispatchOutcome {
        let Some(pair) = reader.pair() else {
            trace!(
                "no handler for unknown packet {}/{}",
                reader.family_id(),
                reader.action_id()
            );
            return DispatchOutcome::Unhandled;
        };

        let Some(entry) = self.entries.get(&pair) else {
            trace!("no handler for {}", pair);
            return DispatchOutcome::Unhandled;
        };

        if entry.requires_initialized && !session.is_initialized() {
            debug!("dropping {} before session initialization", pair);
            return DispatchOutcome::Suppressed;
        }

        match (entry.handler)(reader) {
            Ok(()) => DispatchOutcome::Handled,
            Err(e) => {
                warn!(
                    "failed to handle {}: {} (packet: {})",
                    pair,
                    e,
                    hex::encode(reader.as_bytes())
                );
                DispatchOutcome::Failed
            }
        }
    }

    /// Parses the header of a raw packet and routes it.
    pub fn dispatch_packet(&self, session: &SessionState, packet: &[u8]) -> DispatchOutcome {
        match PacketReader::new(packet) {
            Ok(mut reader) => self.dispatch(session, &mut reader),
            Err(e) => {
                warn!("dropping malformed packet: {} ({})", e, hex::encode(packet));
                DispatchOutcome::Failed
            }
        }
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("pairs", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use super::*;
    use crate::protocol::PacketBuilder;

    fn counting(
        counter: &Arc<AtomicUsize>,
    ) -> impl Fn(&mut PacketReader<'_>) -> Result<()> + Send + Sync + 'static {
        let counter = Arc::clone(counter);
        move |_reader| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn walk_packet() -> bytes::Bytes {
        let mut builder = PacketBuilder::new(PacketFamily::Walk, PacketAction::Player);
        builder.add_short(7).add_char(1).add_char(10).add_char(20);
        builder.build()
    }

    #[test]
    fn test_dispatch_handled() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut table = DispatchTable::new();
        table.register(PacketFamily::Walk, PacketAction::Player, false, counting(&counter));

        let outcome = table.dispatch_packet(&SessionState::new(), &walk_packet());
        assert_eq!(outcome, DispatchOutcome::Handled);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregistered_pair_is_harmless() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut table = DispatchTable::new();
        table.register(PacketFamily::Face, PacketAction::Player, false, counting(&counter));

        let session = SessionState::new();
        assert_eq!(
            table.dispatch_packet(&session, &walk_packet()),
            DispatchOutcome::Unhandled
        );
        // unknown family code
        assert_eq!(
            table.dispatch_packet(&session, &[11, 3]),
            DispatchOutcome::Unhandled
        );
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_suppressed_until_initialized() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut table = DispatchTable::new();
        table.register(PacketFamily::Walk, PacketAction::Player, true, counting(&counter));

        let session = SessionState::new();
        assert_eq!(
            table.dispatch_packet(&session, &walk_packet()),
            DispatchOutcome::Suppressed
        );

        session.set_initialized(true);
        assert_eq!(
            table.dispatch_packet(&session, &walk_packet()),
            DispatchOutcome::Handled
        );
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_decode_failure_is_contained() {
        let mut table = DispatchTable::new();
        table.register(PacketFamily::Walk, PacketAction::Player, false, |reader| {
            reader.get_int()?;
            Ok(())
        });

        let session = SessionState::new();
        // header only: the handler underruns
        assert_eq!(
            table.dispatch_packet(&session, &[7, 9]),
            DispatchOutcome::Failed
        );
        assert_eq!(table.dispatch_packet(&session, &[0, 9]), DispatchOutcome::Failed);
        assert_eq!(table.dispatch_packet(&session, &[7]), DispatchOutcome::Failed);
    }

    #[test]
    fn test_register_replaces() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut table = DispatchTable::new();

        assert!(!table.register(PacketFamily::Walk, PacketAction::Player, false, counting(&first)));
        assert!(table.register(PacketFamily::Walk, PacketAction::Player, false, counting(&second)));
        assert_eq!(table.len(), 1);

        table.dispatch_packet(&SessionState::new(), &walk_packet());
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        assert!(table.unregister(PacketFamily::Walk, PacketAction::Player));
        assert!(table.is_empty());
    }

    #[test]
    fn test_session_state() {
        let session = SessionState::new();
        assert_eq!(session.player_id(), None);
        session.set_player_id(42);
        session.set_initialized(true);
        assert_eq!(session.player_id(), Some(42));
        session.reset();
        assert!(!session.is_initialized());
        assert_eq!(session.player_id(), None);
    }
}
