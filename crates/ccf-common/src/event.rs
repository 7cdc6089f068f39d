//! Created/deleted notifications for downstream consumers
//!
//! Firewall and service-chaining agents react to taxonomy changes; they
//! receive one event per successful create or delete, keyed by resource id.
//! Updates are never pushed.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource kind an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// A single classification record
    Classification,
    /// A classification group
    ClassificationGroup,
}

/// Lifecycle transition carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    /// The resource was created
    Created,
    /// The resource was deleted
    Deleted,
}

/// Notification pushed after a successful create or delete
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomyEvent {
    /// Kind of resource the event refers to
    pub resource_type: ResourceType,
    /// Id of the resource
    pub resource_id: Uuid,
    /// Which transition happened
    pub event: EventKind,
}

impl TaxonomyEvent {
    /// Event for a freshly created resource
    pub fn created(resource_type: ResourceType, resource_id: Uuid) -> Self {
        Self {
            resource_type,
            resource_id,
            event: EventKind::Created,
        }
    }

    /// Event for a deleted resource
    pub fn deleted(resource_type: ResourceType, resource_id: Uuid) -> Self {
        Self {
            resource_type,
            resource_id,
            event: EventKind::Deleted,
        }
    }
}

/// Push API that broadcasts taxonomy changes
///
/// Implementations must be cheap to call; the engine publishes outside its
/// store lock but inside the request.
pub trait EventSink: Send + Sync {
    /// Deliver one event
    fn publish(&self, event: &TaxonomyEvent);
}

/// Sink that emits events to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn publish(&self, event: &TaxonomyEvent) {
        tracing::info!(
            resource_type = ?event.resource_type,
            resource_id = %event.resource_id,
            event = ?event.event,
            "taxonomy event"
        );
    }
}

/// Sink that buffers events for an in-process consumer
#[derive(Debug, Default)]
pub struct BufferSink {
    events: Mutex<Vec<TaxonomyEvent>>,
}

impl BufferSink {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every buffered event, oldest first
    pub fn drain(&self) -> Vec<TaxonomyEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of buffered events
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventSink for BufferSink {
    fn publish(&self, event: &TaxonomyEvent) {
        self.events.lock().push(event.clone());
    }
}
