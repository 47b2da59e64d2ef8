//! Engine event bus.
//!
//! Completion, failure, and status signals are delivered to subscribers
//! over a broadcast channel. Delivery is asynchronous and may be reordered
//! relative to other signals; subscribers that fall behind lose the oldest
//! events (broadcast lag) rather than blocking the engine.

use tokio::sync::broadcast;

use crate::engine::BookingResult;

/// Default buffer size for the event channel.
const EVENT_BUFFER: usize = 256;

/// A signal emitted by the engine or scheduler.
#[derive(Debug, Clone)]
pub enum BookingEvent {
    /// A booking attempt completed with a confirmed result.
    Completed(BookingResult),
    /// A booking attempt produced a failed result.
    Failed(BookingResult),
    /// Human-readable progress/status line.
    StatusChanged(String),
}

/// Handle for emitting and subscribing to booking events.
///
/// Cheaply cloneable; all clones share one channel. Emitting never blocks
/// and never fails the caller: with no subscribers the event is dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<BookingEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_BUFFER);
        Self { tx }
    }

    /// Subscribe to events emitted after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all current subscribers.
    pub fn emit(&self, event: BookingEvent) {
        // A send error only means there are no subscribers right now.
        let _ = self.tx.send(event);
    }

    /// Emit a status line.
    pub fn status_changed(&self, status: impl Into<String>) {
        self.emit(BookingEvent::StatusChanged(status.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_status() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.status_changed("Attempt 1/3");

        let event = rx.recv().await.unwrap();
        match event {
            BookingEvent::StatusChanged(s) => assert_eq!(s, "Attempt 1/3"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new();
        // No subscribers; must not panic or block.
        bus.status_changed("nobody listening");
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let bus = EventBus::new();
        let clone = bus.clone();
        let mut rx = bus.subscribe();

        clone.status_changed("from clone");

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, BookingEvent::StatusChanged(_)));
    }
}
