//! Event system for decoded game messages.
//!
//! Packet handlers publish typed [`Event`]s; any number of collaborators
//! (renderer, chat log, sound) subscribe independently and pick the kinds they
//! care about with an [`EventFilter`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::types::{Direction, MapItem};

/// Decoded game events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Connection established.
    Connected,
    /// Connection lost or closed.
    Disconnected,
    /// The local player's walk was accepted; carries the items now in range.
    MainPlayerWalk { items: Vec<MapItem> },
    /// Another player moved.
    OtherPlayerWalk {
        player_id: u16,
        direction: Direction,
        x: u8,
        y: u8,
    },
    /// A player turned.
    PlayerFace { player_id: u16, direction: Direction },
    /// Another player attacked.
    OtherPlayerAttack { player_id: u16, direction: Direction },
    /// A player spoke in public chat.
    PlayerChat { player_id: u16, message: String },
}

/// Discriminant of [`Event`], used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Connected,
    Disconnected,
    MainPlayerWalk,
    OtherPlayerWalk,
    PlayerFace,
    OtherPlayerAttack,
    PlayerChat,
}

impl Event {
    /// Returns the kind of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Connected => EventKind::Connected,
            Self::Disconnected => EventKind::Disconnected,
            Self::MainPlayerWalk { .. } => EventKind::MainPlayerWalk,
            Self::OtherPlayerWalk { .. } => EventKind::OtherPlayerWalk,
            Self::PlayerFace { .. } => EventKind::PlayerFace,
            Self::OtherPlayerAttack { .. } => EventKind::OtherPlayerAttack,
            Self::PlayerChat { .. } => EventKind::PlayerChat,
        }
    }

    /// Returns the player the event is about, if any.
    #[must_use]
    pub const fn player_id(&self) -> Option<u16> {
        match self {
            Self::OtherPlayerWalk { player_id, .. }
            | Self::PlayerFace { player_id, .. }
            | Self::OtherPlayerAttack { player_id, .. }
            | Self::PlayerChat { player_id, .. } => Some(*player_id),
            _ => None,
        }
    }
}

/// Subscription filter for specific event kinds.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Filter by event kinds.
    pub kinds: Option<Vec<EventKind>>,
    /// Filter by player ID.
    pub player_id: Option<u16>,
}

impl EventFilter {
    /// Creates a filter for specific event kinds.
    #[must_use]
    pub const fn kinds(kinds: Vec<EventKind>) -> Self {
        Self {
            kinds: Some(kinds),
            player_id: None,
        }
    }

    /// Creates a filter for events about one player.
    #[must_use]
    pub const fn player(player_id: u16) -> Self {
        Self {
            kinds: None,
            player_id: Some(player_id),
        }
    }

    /// Restricts the filter to one player.
    #[must_use]
    pub const fn for_player(mut self, player_id: u16) -> Self {
        self.player_id = Some(player_id);
        self
    }

    /// Checks if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(ref kinds) = self.kinds {
            if !kinds.contains(&event.kind()) {
                return false;
            }
        }

        if let Some(expected) = self.player_id {
            if event.player_id() != Some(expected) {
                return false;
            }
        }

        true
    }
}

/// A subscription to events.
pub struct Subscription {
    receiver: broadcast::Receiver<Event>,
    filter: Option<EventFilter>,
}

impl Subscription {
    /// Receives the next matching event.
    ///
    /// Returns `None` once the dispatcher is gone. Events missed because the
    /// subscriber lagged are skipped.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => {
                    if self.filter.as_ref().is_none_or(|f| f.matches(&event)) {
                        return Some(event);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("subscriber lagged, skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

struct EventDispatcherInner {
    sender: broadcast::Sender<Event>,
}

/// Dispatches events to subscribers.
#[derive(Clone)]
pub struct EventDispatcher {
    inner: Arc<EventDispatcherInner>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(EventDispatcherInner { sender }),
        }
    }

    /// Dispatches an event to all subscribers.
    pub fn dispatch(&self, event: Event) {
        tracing::trace!("dispatching {:?}", event.kind());
        // no receivers is fine
        let _ = self.inner.sender.send(event);
    }

    /// Subscribes to events, optionally filtered.
    #[must_use]
    pub fn subscribe(&self, filter: Option<EventFilter>) -> Subscription {
        Subscription {
            receiver: self.inner.sender.subscribe(),
            filter,
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.sender.receiver_count()
    }

    /// Waits for an event matching the filter with timeout.
    ///
    /// Returns `None` if the timeout expires or the channel is closed.
    pub async fn wait_for(&self, filter: EventFilter, timeout: Duration) -> Option<Event> {
        let mut subscription = self.subscribe(Some(filter));

        tokio::select! {
            biased;
            result = subscription.recv() => result,
            () = tokio::time::sleep(timeout) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(player_id: u16) -> Event {
        Event::PlayerChat {
            player_id,
            message: "hi".into(),
        }
    }

    #[tokio::test]
    async fn test_event_dispatch() {
        let dispatcher = EventDispatcher::new(16);
        let mut sub = dispatcher.subscribe(None);

        dispatcher.dispatch(Event::Connected);

        let event = tokio::time::timeout(Duration::from_millis(100), sub.recv())
            .await
            .unwrap();

        assert_eq!(event, Some(Event::Connected));
    }

    #[tokio::test]
    async fn test_subscription_filter() {
        let dispatcher = EventDispatcher::new(16);
        let mut sub = dispatcher.subscribe(Some(EventFilter::kinds(vec![EventKind::PlayerChat])));

        dispatcher.dispatch(Event::Connected);
        dispatcher.dispatch(chat(3));

        let event = tokio::time::timeout(Duration::from_millis(100), sub.recv())
            .await
            .unwrap();
        assert_eq!(event, Some(chat(3)));
    }

    #[tokio::test]
    async fn test_fan_out() {
        let dispatcher = EventDispatcher::new(16);
        let mut a = dispatcher.subscribe(None);
        let mut b = dispatcher.subscribe(None);
        assert_eq!(dispatcher.subscriber_count(), 2);

        dispatcher.dispatch(chat(1));
        assert_eq!(a.recv().await, Some(chat(1)));
        assert_eq!(b.recv().await, Some(chat(1)));
    }

    #[tokio::test]
    async fn test_wait_for_timeout() {
        let dispatcher = EventDispatcher::new(16);
        let result = dispatcher
            .wait_for(EventFilter::player(9), Duration::from_millis(20))
            .await;
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_closed_channel() {
        let dispatcher = EventDispatcher::new(4);
        let mut sub = dispatcher.subscribe(None);
        drop(dispatcher);
        assert_eq!(sub.recv().await, None);
    }

    #[test]
    fn test_event_filter() {
        let filter = EventFilter::kinds(vec![EventKind::PlayerChat, EventKind::PlayerFace]);

        assert!(filter.matches(&chat(1)));
        assert!(filter.matches(&Event::PlayerFace {
            player_id: 1,
            direction: Direction::Up
        }));
        assert!(!filter.matches(&Event::Connected));
    }

    #[test]
    fn test_player_filter() {
        let filter = EventFilter::kinds(vec![EventKind::PlayerChat]).for_player(5);

        assert!(filter.matches(&chat(5)));
        assert!(!filter.matches(&chat(6)));
        assert!(!EventFilter::player(5).matches(&Event::Disconnected));
    }
}
