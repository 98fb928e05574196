//! Event system infrastructure for Consultant Copilot.
//!
//! This crate provides the event system that enables loose coupling between
//! pipeline logic and the presentation layer (chat notifications, dashboards).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! Delivery is fire-and-forget: handlers are best-effort, and pipeline
//! correctness never depends on a notification arriving. This crate has no
//! dependencies on internal crates (entity, domain, etc.), avoiding circular
//! dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when pipeline steps complete (or terminally
/// fail), and are the only channel toward the presentation layer.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted once a meeting's transcript is fetched and persisted.
    /// The presentation layer reacts by asking a human for the meeting type.
    MeetingTranscribed {
        meeting_id: Id,
        /// Meeting title for display in the type-selection prompt.
        title: String,
        /// Chat channel of the meeting's client, when one is linked.
        /// `None` routes the prompt to the operator's default channel.
        notify_chat_id: Option<i64>,
    },
    /// Emitted when a summary has been generated and persisted.
    /// Carries the complete serialized summary entity so the presentation
    /// layer can render it without a follow-up query.
    SummaryCompleted {
        meeting_id: Id,
        /// The type tag the summary was produced with (wire format).
        meeting_type: String,
        summary: Value,
    },
    /// Emitted after action items were handed to the task tracker.
    TasksDispatched {
        meeting_id: Id,
        /// Items newly created in the tracker.
        created: usize,
        /// Items skipped because an identical dispatch already existed.
        skipped: usize,
        /// Items that failed to dispatch and remain retryable.
        failed: usize,
    },
    /// Emitted when a meeting's pipeline reaches the terminal failed state.
    /// `reason` is human-readable and shown to the operator.
    MeetingFailed { meeting_id: Id, reason: String },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially. If a handler panics or errors,
    /// we log it but continue with remaining handlers.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        async fn handle(&self, event: &DomainEvent) {
            let label = match event {
                DomainEvent::MeetingTranscribed { .. } => "transcribed",
                DomainEvent::SummaryCompleted { .. } => "summary",
                DomainEvent::TasksDispatched { .. } => "tasks",
                DomainEvent::MeetingFailed { .. } => "failed",
            };
            self.seen.lock().unwrap().push(label.to_string());
        }
    }

    #[tokio::test]
    async fn publish_reaches_every_registered_handler() {
        let first = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        let second = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });

        let publisher = EventPublisher::new()
            .with_handler(first.clone())
            .with_handler(second.clone());

        publisher
            .publish(DomainEvent::MeetingFailed {
                meeting_id: Id::new_v4(),
                reason: "transcript fetch exhausted retries".to_string(),
            })
            .await;

        assert_eq!(*first.seen.lock().unwrap(), vec!["failed"]);
        assert_eq!(*second.seen.lock().unwrap(), vec!["failed"]);
    }

    #[tokio::test]
    async fn publish_without_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher
            .publish(DomainEvent::TasksDispatched {
                meeting_id: Id::new_v4(),
                created: 2,
                skipped: 1,
                failed: 0,
            })
            .await;
    }
}
