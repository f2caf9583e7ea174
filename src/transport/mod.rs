//! Transport layer for game server communication.
//!
//! A transport moves whole packets. It frames outbound packets itself and
//! delivers each inbound packet, unframed, to the sender installed with
//! [`Transport::set_packet_sender`].

pub mod tcp;

use bytes::Bytes;
use futures::future::BoxFuture;
use tokio::sync::mpsc;

use crate::error::Result;

/// Trait for transport implementations.
pub trait Transport: Send + Sync {
    /// Connects to the server.
    fn connect(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Disconnects from the server.
    fn disconnect(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Sends one packet (header included, not yet framed).
    fn send(&mut self, packet: Bytes) -> BoxFuture<'_, Result<()>>;

    /// Returns true if connected.
    fn is_connected(&self) -> bool;

    /// Sets the channel that receives inbound packets.
    ///
    /// Must be called before each [`Transport::connect`]; the connection
    /// takes ownership of the sender and drops it when the stream ends.
    fn set_packet_sender(&mut self, tx: mpsc::Sender<Bytes>);
}

pub use tcp::{TcpConfig, TcpTransport};
