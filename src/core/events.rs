//! Change notifications for garment mutations
//!
//! Every successful create, update or delete is published on the
//! [`EventBus`] so that cached list views can be dropped and re-fetched.
//!
//! ```text
//! CachedGarmentStore::create ──▶ EventBus::publish() ──▶ broadcast channel ──▶ subscribers
//! ```
//!
//! ```rust,ignore
//! let bus = EventBus::new(64);
//! let mut rx = bus.subscribe();
//! bus.publish(GarmentEvent::Deleted { id });
//! let envelope = rx.recv().await?;
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A garment mutation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum GarmentEvent {
    Created { id: Uuid },
    Updated { id: Uuid },
    Deleted { id: Uuid },
}

impl GarmentEvent {
    pub fn id(&self) -> Uuid {
        match self {
            GarmentEvent::Created { id }
            | GarmentEvent::Updated { id }
            | GarmentEvent::Deleted { id } => *id,
        }
    }

    /// Get the action name (created, updated, deleted)
    pub fn action(&self) -> &'static str {
        match self {
            GarmentEvent::Created { .. } => "created",
            GarmentEvent::Updated { .. } => "updated",
            GarmentEvent::Deleted { .. } => "deleted",
        }
    }
}

/// Event with delivery metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub event: GarmentEvent,
}

impl EventEnvelope {
    pub fn new(event: GarmentEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers
    ///
    /// Returns the number of receivers; an event with no subscribers is dropped.
    pub fn publish(&self, event: GarmentEvent) -> usize {
        tracing::debug!(action = event.action(), garment_id = %event.id(), "publishing garment event");
        self.sender.send(EventEnvelope::new(event)).unwrap_or(0)
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Log every event published from now on
    ///
    /// The task ends once every clone of the bus is dropped.
    pub fn spawn_logger(&self) -> JoinHandle<()> {
        let mut rx = self.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(envelope) => tracing::info!(
                        action = envelope.event.action(),
                        garment_id = %envelope.event.id(),
                        event_id = %envelope.id,
                        "garment changed"
                    ),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event logger fell behind")
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
