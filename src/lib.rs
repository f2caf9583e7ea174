//! # eocodec
//!
//! Packet and data-file codec layer for Endless Online style game clients.
//!
//! This library covers the byte-level contract between a client and a game
//! server, plus the record files the client ships with.
//!
//! ## Features
//!
//! - Base-253 number encoding used by every packet field and data file
//! - Packet building and reading with typed family/action identifiers
//! - Item, NPC, class and spell data files (load, query, save)
//! - A dispatch table routing inbound packets to handlers
//! - Async TCP transport and an event system built on Tokio
//!
//! ## Quick Start
//!
//! ```no_run
//! use eocodec::{Direction, EventFilter, EventKind, GameClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), eocodec::Error> {
//!     let mut client = GameClient::tcp("game.example.net", 8078);
//!     let mut chat = client.subscribe(Some(EventFilter::kinds(vec![EventKind::PlayerChat])));
//!
//!     client.connect().await?;
//!     // after the login handshake
//!     client.set_initialized(1);
//!
//!     client.commands().walk(Direction::Up, 10, 11).await?;
//!     if let Some(event) = chat.recv().await {
//!         println!("{event:?}");
//!     }
//!
//!     client.disconnect().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`protocol`] - Number codec, packet builder/reader, family/action ids, framing
//! - [`data`] - Record formats and the data file container
//! - [`dispatch`] - (family, action) → handler routing and session state
//! - [`handlers`] - Built-in decoders for inbound game messages
//! - [`event`] - Event fan-out to subscribers
//! - [`commands`] - Typed outbound messages
//! - [`transport`] - Transport trait and TCP implementation
//! - [`client`] - High-level [`GameClient`]

pub mod client;
pub mod commands;
pub mod config;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod handlers;
pub mod protocol;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::GameClient;
pub use commands::CommandSender;
pub use config::{ClientConfig, DataPaths};
pub use data::{
    ClassFile, ClassRecord, DataFile, DataRecord, GameData, ItemFile, ItemRecord, ItemSpecific,
    ItemType, NpcFile, NpcRecord, RecordKind, SpellFile, SpellRecord,
};
pub use dispatch::{DispatchOutcome, DispatchTable, SessionState};
pub use error::{CodecError, Error, FrameError, Result};
pub use event::{Event, EventDispatcher, EventFilter, EventKind, Subscription};
pub use protocol::{FamilyActionPair, PacketAction, PacketBuilder, PacketFamily, PacketReader};
pub use transport::{TcpConfig, TcpTransport, Transport};
pub use types::{Direction, MapItem};
