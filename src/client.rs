//! Main [`GameClient`] implementation.
//!
//! This module provides the high-level [`GameClient`] that combines the
//! transport, the dispatch table, event publishing and typed sends.
//!
//! ```text
//! transport read task ──mpsc──► process task ──► DispatchTable ──► EventDispatcher
//!                                                                       │
//! CommandSender ──► transport.send                        subscribers ◄─┘
//! ```

use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::commands::CommandSender;
use crate::config::ClientConfig;
use crate::data::GameData;
use crate::dispatch::{DispatchOutcome, DispatchTable, SessionState};
use crate::error::{Error, Result};
use crate::event::{Event, EventDispatcher, EventFilter, Subscription};
use crate::handlers;
use crate::protocol::{PacketAction, PacketFamily, PacketReader};
use crate::transport::{TcpConfig, TcpTransport, Transport};

/// Client for a game server.
pub struct GameClient<T> {
    config: ClientConfig,
    transport: Arc<Mutex<T>>,
    events: EventDispatcher,
    session: Arc<SessionState>,
    table: Arc<DispatchTable>,
    commands: CommandSender<T>,
    data: Option<Arc<GameData>>,

    // Background task
    process_task: Option<JoinHandle<()>>,
}

impl GameClient<TcpTransport> {
    /// Creates a new client for `host:port`.
    ///
    /// The client is not yet connected.
    #[must_use]
    pub fn tcp(host: impl Into<String>, port: u16) -> Self {
        Self::with_tcp_config(TcpConfig::new(host).port(port))
    }

    /// Creates a new client with custom TCP configuration.
    #[must_use]
    pub fn with_tcp_config(config: TcpConfig) -> Self {
        Self::new(TcpTransport::new(config), ClientConfig::default())
    }
}

impl<T: Transport + 'static> GameClient<T> {
    /// Creates a new client with the given transport.
    ///
    /// The built-in handlers are registered; more can be added with
    /// [`GameClient::register_handler`] before connecting.
    #[must_use]
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let events = EventDispatcher::new(config.event_capacity);
        let transport = Arc::new(Mutex::new(transport));
        let session = Arc::new(SessionState::new());

        let mut table = DispatchTable::new();
        handlers::register_default_handlers(&mut table, &events);

        let commands = CommandSender::new(Arc::clone(&transport), Arc::clone(&session))
            .with_utc_offset(config.utc_offset_secs);

        Self {
            config,
            transport,
            events,
            session,
            table: Arc::new(table),
            commands,
            data: None,
            process_task: None,
        }
    }

    /// Attaches loaded game data.
    #[must_use]
    pub fn with_data(mut self, data: Arc<GameData>) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns the attached game data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Arc<GameData>> {
        self.data.as_ref()
    }

    /// Registers a raw handler for a (family, action) pair, replacing any
    /// existing one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionActive`] while connected.
    pub fn register_handler<F>(
        &mut self,
        family: PacketFamily,
        action: PacketAction,
        requires_initialized: bool,
        handler: F,
    ) -> Result<bool>
    where
        F: Fn(&mut PacketReader<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let table = Arc::get_mut(&mut self.table).ok_or(Error::SessionActive)?;
        Ok(table.register(family, action, requires_initialized, handler))
    }

    /// Registers a decoder whose events are published to subscribers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionActive`] while connected.
    pub fn register_event_handler<F>(
        &mut self,
        family: PacketFamily,
        action: PacketAction,
        requires_initialized: bool,
        decode: F,
    ) -> Result<bool>
    where
        F: Fn(&mut PacketReader<'_>) -> Result<Option<Event>> + Send + Sync + 'static,
    {
        let table = Arc::get_mut(&mut self.table).ok_or(Error::SessionActive)?;
        Ok(handlers::register_event_handler(
            table,
            &self.events,
            family,
            action,
            requires_initialized,
            decode,
        ))
    }

    /// Connects to the server and starts processing inbound packets.
    ///
    /// Does nothing while a live connection is being processed. After the
    /// server closed the connection, the transport is dialed again.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to connect.
    pub async fn connect(&mut self) -> Result<()> {
        let connected = self.transport.lock().await.is_connected();
        if let Some(task) = self.process_task.take() {
            if connected && !task.is_finished() {
                self.process_task = Some(task);
                return Ok(());
            }
            // the transport dropped its sender, so the old task drains and exits
            let _ = task.await;
        }

        let (packet_tx, packet_rx) = mpsc::channel::<Bytes>(self.config.frame_channel_capacity);

        {
            let mut transport = self.transport.lock().await;
            transport.set_packet_sender(packet_tx);
            transport.connect().await?;
        }

        self.session.reset();
        self.start_processing(packet_rx);
        self.events.dispatch(Event::Connected);
        Ok(())
    }

    /// Spawns the packet processing task.
    fn start_processing(&mut self, mut packet_rx: mpsc::Receiver<Bytes>) {
        let table = Arc::clone(&self.table);
        let session = Arc::clone(&self.session);
        let events = self.events.clone();

        let process_task = tokio::spawn(async move {
            while let Some(packet) = packet_rx.recv().await {
                process_packet(&table, &session, &packet);
            }
            tracing::debug!("inbound packet stream ended");
            events.dispatch(Event::Disconnected);
        });
        self.process_task = Some(process_task);
    }

    /// Disconnects from the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails to disconnect.
    pub async fn disconnect(&mut self) -> Result<()> {
        if let Some(task) = self.process_task.take() {
            let finished = task.is_finished();
            task.abort();
            // wait for the task to drop its handle on the table
            let _ = task.await;
            if !finished {
                self.events.dispatch(Event::Disconnected);
            }
        }

        {
            let mut transport = self.transport.lock().await;
            transport.disconnect().await?;
        }

        self.session.reset();
        Ok(())
    }

    /// Returns true if connected.
    pub async fn is_connected(&self) -> bool {
        let transport = self.transport.lock().await;
        transport.is_connected()
    }

    /// Marks the session as initialized for `player_id`.
    ///
    /// Handlers that require an initialized session start running, and typed
    /// sends are accepted.
    pub fn set_initialized(&self, player_id: u16) {
        self.session.set_player_id(player_id);
        self.session.set_initialized(true);
    }

    /// Returns the shared session state.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionState> {
        &self.session
    }

    /// Returns the typed command sender.
    #[must_use]
    pub const fn commands(&self) -> &CommandSender<T> {
        &self.commands
    }

    /// Returns the event dispatcher.
    #[must_use]
    pub const fn events(&self) -> &EventDispatcher {
        &self.events
    }

    /// Subscribes to events, optionally filtered.
    #[must_use]
    pub fn subscribe(&self, filter: Option<EventFilter>) -> Subscription {
        self.events.subscribe(filter)
    }

    /// Routes one raw packet synchronously, as the processing task would.
    #[must_use]
    pub fn handle_packet(&self, packet: &[u8]) -> DispatchOutcome {
        process_packet(&self.table, &self.session, packet)
    }
}

/// Routes one inbound packet.
fn process_packet(table: &DispatchTable, session: &SessionState, packet: &[u8]) -> DispatchOutcome {
    tracing::trace!("processing packet: {} bytes", packet.len());
    table.dispatch_packet(session, packet)
}

impl<T> Drop for GameClient<T> {
    fn drop(&mut self) {
        if let Some(task) = self.process_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use futures::future::BoxFuture;

    use super::*;
    use crate::commands::walk_packet;
    use crate::event::EventKind;
    use crate::protocol::PacketBuilder;
    use crate::types::Direction;

    type Inbound = Arc<StdMutex<Option<mpsc::Sender<Bytes>>>>;

    /// In-memory transport recording sent packets.
    #[derive(Default)]
    struct MockTransport {
        connected: bool,
        sent: Arc<StdMutex<Vec<Bytes>>>,
        pending_tx: Option<mpsc::Sender<Bytes>>,
        inbound: Inbound,
    }

    impl Transport for MockTransport {
        fn connect(&mut self) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                self.connected = true;
                *self.inbound.lock().unwrap() = self.pending_tx.take();
                Ok(())
            })
        }

        fn disconnect(&mut self) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                self.connected = false;
                self.inbound.lock().unwrap().take();
                Ok(())
            })
        }

        fn send(&mut self, packet: Bytes) -> BoxFuture<'_, Result<()>> {
            Box::pin(async move {
                self.sent.lock().unwrap().push(packet);
                Ok(())
            })
        }

        fn is_connected(&self) -> bool {
            self.connected && self.inbound.lock().unwrap().is_some()
        }

        fn set_packet_sender(&mut self, tx: mpsc::Sender<Bytes>) {
            self.pending_tx = Some(tx);
        }
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }

    fn client() -> (GameClient<MockTransport>, Arc<StdMutex<Vec<Bytes>>>, Inbound) {
        init_tracing();
        let transport = MockTransport::default();
        let sent = Arc::clone(&transport.sent);
        let inbound = Arc::clone(&transport.inbound);
        (
            GameClient::new(transport, ClientConfig::new().event_capacity(16)),
            sent,
            inbound,
        )
    }

    async fn push(inbound: &Inbound, packet: Bytes) {
        let tx = inbound.lock().unwrap().clone().unwrap();
        tx.send(packet).await.unwrap();
    }

    fn chat_packet(player_id: u16, message: &str) -> Bytes {
        let mut builder = PacketBuilder::new(PacketFamily::Talk, PacketAction::Player);
        builder.add_short(player_id).add_string(message);
        builder.build()
    }

    #[tokio::test]
    async fn test_inbound_packets_become_events() {
        let (mut client, _sent, inbound) = client();
        let mut sub = client.subscribe(Some(EventFilter::kinds(vec![EventKind::PlayerChat])));

        client.connect().await.unwrap();
        client.set_initialized(1);
        push(&inbound, chat_packet(9, "hey")).await;

        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap();
        assert_eq!(
            event,
            Some(Event::PlayerChat {
                player_id: 9,
                message: "hey".into()
            })
        );

        client.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_packet_does_not_stop_processing() {
        let (mut client, _sent, inbound) = client();
        let mut sub = client.subscribe(Some(EventFilter::kinds(vec![EventKind::PlayerChat])));

        client.connect().await.unwrap();
        client.set_initialized(1);
        push(&inbound, Bytes::from_static(&[0, 0, 0])).await;
        push(&inbound, Bytes::from_static(&[19, 9])).await;
        push(&inbound, chat_packet(2, "still here")).await;

        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(Event::PlayerChat { player_id: 2, .. })));
    }

    #[tokio::test]
    async fn test_sends_require_initialized_session() {
        let (mut client, sent, _inbound) = client();
        client.connect().await.unwrap();

        assert!(matches!(
            client.commands().face(Direction::Up).await,
            Err(Error::NotInitialized)
        ));

        client.set_initialized(1);
        client
            .commands()
            .walk(Direction::Up, 10, 20)
            .await
            .unwrap();
        client.commands().say("hi").await.unwrap();

        let sent = sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        // same layout apart from the timestamp digits
        let expected = walk_packet(Direction::Up, 10, 20, false, 0);
        assert_eq!(&sent[0][..3], &expected[..3]);
        assert_eq!(&sent[0][6..], &expected[6..]);
    }

    #[tokio::test]
    async fn test_sends_require_connection() {
        let (client, _sent, _inbound) = client();
        client.set_initialized(1);
        assert!(matches!(
            client.commands().say("hi").await,
            Err(Error::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_register_only_while_disconnected() {
        let (mut client, _sent, inbound) = client();
        let result = client.register_event_handler(
            PacketFamily::Talk,
            PacketAction::Player,
            false,
            |reader| {
                Ok(Some(Event::PlayerChat {
                    player_id: reader.get_short()?,
                    message: reader.get_end_string().to_uppercase(),
                }))
            },
        );
        assert!(result.unwrap());

        client.connect().await.unwrap();
        assert!(matches!(
            client.register_handler(PacketFamily::Face, PacketAction::Player, false, |_| Ok(())),
            Err(Error::SessionActive)
        ));

        let mut sub = client.subscribe(None);
        push(&inbound, chat_packet(3, "loud")).await;
        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(Event::PlayerChat { message, .. }) if message == "LOUD"));

        client.disconnect().await.unwrap();
        assert!(!client.is_connected().await);
        assert!(
            client
                .register_handler(PacketFamily::Face, PacketAction::Player, false, |_| Ok(()))
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_disconnect_events() {
        let (mut client, _sent, _inbound) = client();
        let mut sub = client.subscribe(None);

        client.connect().await.unwrap();
        client.disconnect().await.unwrap();

        assert_eq!(sub.recv().await, Some(Event::Connected));
        assert_eq!(sub.recv().await, Some(Event::Disconnected));
        assert!(!client.session().is_initialized());
    }

    #[tokio::test]
    async fn test_reconnect_after_remote_close() {
        let (mut client, _sent, inbound) = client();
        let mut sub = client.subscribe(None);

        client.connect().await.unwrap();
        assert_eq!(sub.recv().await, Some(Event::Connected));

        // server side hangs up: the inbound stream ends
        inbound.lock().unwrap().take();
        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(Event::Disconnected));

        client.connect().await.unwrap();
        assert_eq!(sub.recv().await, Some(Event::Connected));
        client.set_initialized(1);
        push(&inbound, chat_packet(4, "back")).await;

        let event = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(Event::PlayerChat { player_id: 4, .. })));
        client.disconnect().await.unwrap();
    }

    #[test]
    fn test_handle_packet_without_connection() {
        let (client, _sent, _inbound) = client();
        let mut builder = PacketBuilder::new(PacketFamily::Walk, PacketAction::Player);
        builder.add_short(1).add_char(0).add_char(1).add_char(1);
        let packet = builder.build();

        assert_eq!(client.handle_packet(&packet), DispatchOutcome::Suppressed);
        client.set_initialized(5);
        assert_eq!(client.handle_packet(&packet), DispatchOutcome::Handled);
        assert_eq!(client.session().player_id(), Some(5));
        assert!(client.data().is_none());
    }
}
