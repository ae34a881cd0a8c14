//! Event sinks and the pump that feeds them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use taskflow_protocols::{EventError, EventSink, WorkflowEvent};

/// Sink that writes every event to the tracing log.
#[derive(Debug, Default)]
pub struct LogEventSink;

#[async_trait]
impl EventSink for LogEventSink {
    fn id(&self) -> &str {
        "log"
    }

    async fn publish(&self, event: WorkflowEvent) -> Result<(), EventError> {
        info!(
            event = %event.name,
            run_id = %event.run_id,
            node_id = event.node_id.as_deref().unwrap_or("-"),
            payload = %event.payload,
            "Workflow event"
        );
        Ok(())
    }
}

/// Sink that keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().await.clone()
    }

    /// Event names in delivery order.
    pub async fn names(&self) -> Vec<String> {
        self.events.lock().await.iter().map(|e| e.name.clone()).collect()
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn clear(&self) {
        self.events.lock().await.clear();
    }
}

#[async_trait]
impl EventSink for MemoryEventSink {
    fn id(&self) -> &str {
        "memory"
    }

    async fn publish(&self, event: WorkflowEvent) -> Result<(), EventError> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

/// Drains an event channel into a sink on a background task.
///
/// The pump stops once every sender of the channel has been dropped.
pub struct EventPump {
    handle: JoinHandle<u64>,
}

impl EventPump {
    pub fn spawn(mut receiver: mpsc::Receiver<WorkflowEvent>, sink: Arc<dyn EventSink>) -> Self {
        let handle = tokio::spawn(async move {
            let mut delivered = 0u64;
            while let Some(event) = receiver.recv().await {
                let name = event.name.clone();
                match sink.publish(event).await {
                    Ok(()) => delivered += 1,
                    Err(e) => warn!(sink = %sink.id(), event = %name, "Event delivery failed: {}", e),
                }
            }
            debug!(sink = %sink.id(), delivered, "Event pump stopped");
            delivered
        });
        Self { handle }
    }

    /// Wait for the channel to close and return how many events were delivered.
    pub async fn finish(self) -> u64 {
        match self.handle.await {
            Ok(delivered) => delivered,
            Err(e) => {
                warn!("Event pump task failed: {}", e);
                0
            }
        }
    }

    /// Stop draining immediately; undelivered events are discarded.
    pub fn abort(self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskflow_protocols::EventEmitter;

    struct FailingSink;

    #[async_trait]
    impl EventSink for FailingSink {
        fn id(&self) -> &str {
            "failing"
        }

        async fn publish(&self, _event: WorkflowEvent) -> Result<(), EventError> {
            Err(EventError::DeliveryFailed("bus offline".to_string()))
        }
    }

    fn event(name: &str) -> WorkflowEvent {
        WorkflowEvent::new(name, json!({"n": 1}), "run-1", None)
    }

    #[tokio::test]
    async fn test_pump_delivers_in_order() {
        let (emitter, rx) = EventEmitter::channel(8);
        let sink = Arc::new(MemoryEventSink::new());
        let pump = EventPump::spawn(rx, sink.clone());

        emitter.emit(event("a"));
        emitter.emit(event("b"));
        emitter.emit(event("c"));
        drop(emitter);

        assert_eq!(pump.finish().await, 3);
        assert_eq!(sink.names().await, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_pump_survives_sink_failures() {
        let (emitter, rx) = EventEmitter::channel(8);
        let pump = EventPump::spawn(rx, Arc::new(FailingSink));

        emitter.emit(event("a"));
        emitter.emit(event("b"));
        drop(emitter);

        assert_eq!(pump.finish().await, 0);
    }

    #[tokio::test]
    async fn test_log_sink_accepts_events() {
        let sink = LogEventSink;
        assert_eq!(sink.id(), "log");
        assert!(sink.publish(event("a")).await.is_ok());
    }

    #[tokio::test]
    async fn test_memory_sink_clear() {
        let sink = MemoryEventSink::new();
        sink.publish(event("a")).await.unwrap();
        assert_eq!(sink.len().await, 1);
        sink.clear().await;
        assert_eq!(sink.len().await, 0);
    }
}
