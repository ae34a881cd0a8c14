//! Event emission.
//!
//! Tasks and the runner hand events to an [`EventEmitter`], which pushes them
//! onto a bounded channel without waiting. Delivery is best-effort: a full or
//! closed channel drops the event and bumps a counter. Whatever drains the
//! channel into an [`EventSink`] owns persistence, ordering and retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::error::EventError;

/// A domain or lifecycle event raised during a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEvent {
    pub name: String,
    pub payload: serde_json::Value,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    pub emitted_at: DateTime<Utc>,
}

impl WorkflowEvent {
    pub fn new(
        name: impl Into<String>,
        payload: serde_json::Value,
        run_id: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            payload,
            run_id: run_id.into(),
            node_id,
            emitted_at: Utc::now(),
        }
    }
}

/// Fire-and-forget handle onto an event channel.
#[derive(Clone, Default)]
pub struct EventEmitter {
    sender: Option<mpsc::Sender<WorkflowEvent>>,
    dropped: Arc<AtomicU64>,
}

impl EventEmitter {
    pub fn new(sender: mpsc::Sender<WorkflowEvent>) -> Self {
        Self {
            sender: Some(sender),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emitter that discards every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Create an emitter together with the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.as_ref().is_some_and(|s| !s.is_closed())
    }

    /// Hand an event to the channel. Returns whether it was accepted.
    pub fn emit(&self, event: WorkflowEvent) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };

        match sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!(event = %event.name, run_id = %event.run_id, "Event channel full, dropping event");
                false
            }
            Err(TrySendError::Closed(event)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                debug!(event = %event.name, "Event channel closed, dropping event");
                false
            }
        }
    }

    /// Number of events that could not be handed off.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("enabled", &self.is_enabled())
            .field("dropped", &self.dropped_count())
            .finish()
    }
}

/// Destination for workflow events (event bus, log, test collector).
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Returns the sink ID.
    fn id(&self) -> &str;

    /// Deliver one event.
    async fn publish(&self, event: WorkflowEvent) -> Result<(), EventError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(name: &str) -> WorkflowEvent {
        WorkflowEvent::new(name, json!({}), "run-1", Some("node-1".to_string()))
    }

    #[tokio::test]
    async fn test_emit_delivers_to_channel() {
        let (emitter, mut rx) = EventEmitter::channel(4);
        assert!(emitter.is_enabled());
        assert!(emitter.emit(event("a")));

        let received = rx.recv().await.unwrap();
        assert_eq!(received.name, "a");
        assert_eq!(received.node_id.as_deref(), Some("node-1"));
    }

    #[test]
    fn test_disabled_emitter_drops_silently() {
        let emitter = EventEmitter::disabled();
        assert!(!emitter.is_enabled());
        assert!(!emitter.emit(event("a")));
        assert_eq!(emitter.dropped_count(), 0);
    }

    #[test]
    fn test_full_channel_drops_and_counts() {
        let (emitter, _rx) = EventEmitter::channel(1);
        assert!(emitter.emit(event("a")));
        assert!(!emitter.emit(event("b")));
        assert!(!emitter.emit(event("c")));
        assert_eq!(emitter.dropped_count(), 2);
    }

    #[test]
    fn test_closed_channel_drops_and_counts() {
        let (emitter, rx) = EventEmitter::channel(4);
        drop(rx);
        assert!(!emitter.is_enabled());
        assert!(!emitter.emit(event("a")));
        assert_eq!(emitter.dropped_count(), 1);
    }

    #[test]
    fn test_clones_share_drop_counter() {
        let (emitter, _rx) = EventEmitter::channel(1);
        let clone = emitter.clone();
        emitter.emit(event("a"));
        clone.emit(event("b"));
        assert_eq!(emitter.dropped_count(), 1);
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(event("hubspot.contact.processed")).unwrap();
        assert_eq!(json["name"], "hubspot.contact.processed");
        assert_eq!(json["runId"], "run-1");
        assert_eq!(json["nodeId"], "node-1");
        assert!(json.get("emittedAt").is_some());
    }
}
