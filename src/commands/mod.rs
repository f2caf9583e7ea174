//! Typed outbound messages.
//!
//! Each send builds one packet and hands it to the transport. Sends require
//! a connected transport and an initialized session; nothing is queued.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::dispatch::SessionState;
use crate::error::{Error, Result};
use crate::protocol::{PacketAction, PacketBuilder, PacketFamily};
use crate::transport::Transport;
use crate::types::Direction;

const SECONDS_PER_DAY: u64 = 86_400;

/// Hundredths of a second since midnight UTC, as sent in movement packets.
///
/// Clients traditionally count from local midnight; use
/// [`timestamp_with_offset`] to match a server that expects that.
#[must_use]
pub fn timestamp() -> u32 {
    timestamp_with_offset(0)
}

/// [`timestamp`] counted from midnight at `utc_offset_secs` from UTC.
#[must_use]
pub fn timestamp_with_offset(utc_offset_secs: i32) -> u32 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    timestamp_at(
        shift(elapsed.as_secs(), utc_offset_secs),
        elapsed.subsec_millis(),
    )
}

fn shift(unix_secs: u64, offset_secs: i32) -> u64 {
    unix_secs.saturating_add_signed(i64::from(offset_secs))
}

/// [`timestamp`] for a given Unix time.
#[must_use]
pub const fn timestamp_at(unix_secs: u64, millis: u32) -> u32 {
    ((unix_secs % SECONDS_PER_DAY) * 100) as u32 + millis / 10
}

/// Walk/Player (or Walk/Admin): `direction:1 timestamp:3 x:1 y:1`.
#[must_use]
pub fn walk_packet(direction: Direction, x: u8, y: u8, admin: bool, timestamp: u32) -> Bytes {
    let action = if admin {
        PacketAction::Admin
    } else {
        PacketAction::Player
    };
    let mut builder = PacketBuilder::new(PacketFamily::Walk, action);
    builder
        .add_char(direction.to_byte())
        .add_three(timestamp)
        .add_char(x)
        .add_char(y);
    builder.build()
}

/// Face/Player: `direction:1`.
#[must_use]
pub fn face_packet(direction: Direction) -> Bytes {
    let mut builder = PacketBuilder::new(PacketFamily::Face, PacketAction::Player);
    builder.add_char(direction.to_byte());
    builder.build()
}

/// Attack/Use: `direction:1 timestamp:3`.
#[must_use]
pub fn attack_packet(direction: Direction, timestamp: u32) -> Bytes {
    let mut builder = PacketBuilder::new(PacketFamily::Attack, PacketAction::Use);
    builder.add_char(direction.to_byte()).add_three(timestamp);
    builder.build()
}

/// Talk/Report: the message text.
#[must_use]
pub fn say_packet(message: &str) -> Bytes {
    let mut builder = PacketBuilder::new(PacketFamily::Talk, PacketAction::Report);
    builder.add_string(message);
    builder.build()
}

/// Sends typed game messages.
pub struct CommandSender<T> {
    transport: Arc<Mutex<T>>,
    session: Arc<SessionState>,
    utc_offset_secs: i32,
}

impl<T> Clone for CommandSender<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            session: Arc::clone(&self.session),
            utc_offset_secs: self.utc_offset_secs,
        }
    }
}

impl<T: Transport> CommandSender<T> {
    /// Creates a new command sender.
    #[must_use]
    pub const fn new(transport: Arc<Mutex<T>>, session: Arc<SessionState>) -> Self {
        Self {
            transport,
            session,
            utc_offset_secs: 0,
        }
    }

    /// Sets the offset from UTC used for movement timestamps.
    #[must_use]
    pub const fn with_utc_offset(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    fn timestamp(&self) -> u32 {
        timestamp_with_offset(self.utc_offset_secs)
    }

    /// Sends a pre-built packet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before the session is initialized,
    /// [`Error::NotConnected`] without a connection, or the transport's error.
    pub async fn send_packet(&self, packet: Bytes) -> Result<()> {
        if !self.session.is_initialized() {
            return Err(Error::NotInitialized);
        }

        let mut transport = self.transport.lock().await;
        if !transport.is_connected() {
            return Err(Error::NotConnected);
        }
        transport.send(packet).await
    }

    /// Walks one step.
    pub async fn walk(&self, direction: Direction, x: u8, y: u8) -> Result<()> {
        self.send_packet(walk_packet(direction, x, y, false, self.timestamp()))
            .await
    }

    /// Walks one step, ignoring collision (admin only).
    pub async fn admin_walk(&self, direction: Direction, x: u8, y: u8) -> Result<()> {
        self.send_packet(walk_packet(direction, x, y, true, self.timestamp()))
            .await
    }

    /// Turns to face `direction`.
    pub async fn face(&self, direction: Direction) -> Result<()> {
        self.send_packet(face_packet(direction)).await
    }

    /// Attacks in `direction`.
    pub async fn attack(&self, direction: Direction) -> Result<()> {
        self.send_packet(attack_packet(direction, self.timestamp())).await
    }

    /// Says `message` in public chat.
    pub async fn say(&self, message: &str) -> Result<()> {
        self.send_packet(say_packet(message)).await
    }
}
