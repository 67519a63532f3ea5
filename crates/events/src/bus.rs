//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`DomainEvent`]s,
//! shared via `Arc<EventBus>` across the application.

use annolab_core::types::{DbId, Timestamp};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// DomainEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred on the platform.
///
/// Constructed via [`DomainEvent::new`] and enriched with
/// [`with_entity`](DomainEvent::with_entity),
/// [`with_actor`](DomainEvent::with_actor), and
/// [`with_payload`](DomainEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainEvent {
    /// Dot-separated event name, e.g. `"span_annotation.created"`.
    pub event_type: String,

    /// Optional subject entity kind (e.g. `"document"`, `"connection"`).
    pub entity_type: Option<String>,

    /// Optional subject entity database id.
    pub entity_id: Option<DbId>,

    /// Optional id of the annotator that triggered the event.
    pub actor_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub occurred_at: Timestamp,
}

impl DomainEvent {
    /// Create a new event carrying only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            entity_type: None,
            entity_id: None,
            actor_id: None,
            payload: serde_json::Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Attach the subject entity to the event.
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id);
        self
    }

    /// Attach the acting annotator to the event.
    pub fn with_actor(mut self, actor_id: DbId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DomainEvent`].
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero subscribers the event is silently dropped; the
    /// persistence service (when running) ensures database capture.
    pub fn publish(&self, event: DomainEvent) {
        // SendError only means there are no receivers right now.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let event = DomainEvent::new("span_annotation.created")
            .with_entity("span_annotation", 42)
            .with_actor(7)
            .with_payload(serde_json::json!({"document_id": 3}));

        bus.publish(event);

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "span_annotation.created");
        assert_eq!(received.entity_type.as_deref(), Some("span_annotation"));
        assert_eq!(received.entity_id, Some(42));
        assert_eq!(received.actor_id, Some(7));
        assert_eq!(received.payload["document_id"], 3);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(DomainEvent::new("document.deleted"));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.event_type, "document.deleted");
        assert_eq!(e2.event_type, "document.deleted");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(DomainEvent::new("orphan.event"));
    }

    #[test]
    fn bare_event_has_empty_optional_fields() {
        let event = DomainEvent::new("bare.event");
        assert_eq!(event.event_type, "bare.event");
        assert!(event.entity_type.is_none());
        assert!(event.entity_id.is_none());
        assert!(event.actor_id.is_none());
        assert!(event.payload.is_object());
    }
}
