//! Workflow execution context.
//!
//! One context exists per pipeline run. It is the only channel tasks use to
//! hand data to each other, and it carries the event emitter and the run's
//! cancellation token.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::TaskError;
use crate::event::{EventEmitter, WorkflowEvent};

/// Well-known context keys written by the bundled tasks.
pub mod keys {
    pub const HTTP_RESPONSE: &str = "httpResponse";
    pub const HTTP_STATUS: &str = "httpStatus";
    pub const KV_VALUE: &str = "kvValue";
    pub const HUBSPOT_CONTACT: &str = "hubspotContact";
    pub const HUBSPOT_NOTE: &str = "hubspotNote";
}

/// Index from context key to the task types that declare they produce it.
///
/// Built once from the registered task definitions; used to tell a workflow
/// author which upstream task a missing key was supposed to come from.
#[derive(Debug, Clone, Default)]
pub struct ProducerIndex {
    producers: HashMap<String, Vec<String>>,
}

impl ProducerIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `task_type` writes `key`.
    pub fn insert(&mut self, key: impl Into<String>, task_type: impl Into<String>) {
        let task_type = task_type.into();
        let entry = self.producers.entry(key.into()).or_default();
        if !entry.contains(&task_type) {
            entry.push(task_type);
            entry.sort();
        }
    }

    pub fn producers_of(&self, key: &str) -> &[String] {
        self.producers.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human description of who is expected to write `key`.
    pub fn describe(&self, key: &str) -> String {
        match self.producers_of(key) {
            [] => "an upstream task".to_string(),
            [single] => format!("task type '{}'", single),
            many => format!(
                "one of task types {}",
                many.iter()
                    .map(|t| format!("'{}'", t))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }
}

/// Mutable, per-run data bag shared by every task in one pipeline run.
#[derive(Debug)]
pub struct WorkflowContext {
    run_id: String,
    node_id: String,
    data: HashMap<String, Value>,
    /// Key -> node id that last wrote it.
    provenance: HashMap<String, String>,
    producers: Arc<ProducerIndex>,
    emitter: EventEmitter,
    cancellation: CancellationToken,
}

impl WorkflowContext {
    /// Create a new, empty context for one run.
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            node_id: String::new(),
            data: HashMap::new(),
            provenance: HashMap::new(),
            producers: Arc::new(ProducerIndex::new()),
            emitter: EventEmitter::disabled(),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_emitter(mut self, emitter: EventEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn with_producers(mut self, producers: Arc<ProducerIndex>) -> Self {
        self.producers = producers;
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Seed the context with caller-supplied data. Seeded keys have no
    /// producing node.
    pub fn with_data(mut self, data: HashMap<String, Value>) -> Self {
        self.data.extend(data);
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Node currently executing.
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Set by the runner before each task invocation.
    pub fn set_node_id(&mut self, node_id: impl Into<String>) {
        self.node_id = node_id.into();
    }

    /// Get a value from the context data.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.data
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn get_value(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Read a key an upstream task is expected to have written.
    ///
    /// Absence is a configuration problem in the workflow, so it fails with
    /// an error naming the key and the task type expected to provide it.
    pub fn require(&self, key: &str) -> Result<&Value, TaskError> {
        self.data
            .get(key)
            .ok_or_else(|| TaskError::MissingContextKey {
                key: key.to_string(),
                producer: self.producers.describe(key),
            })
    }

    /// Write a raw JSON value, recording the current node as its producer.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if !self.node_id.is_empty() {
            self.provenance.insert(key.clone(), self.node_id.clone());
        }
        self.data.insert(key, value);
    }

    /// Serialize and write a value.
    pub fn set<T: Serialize>(&mut self, key: impl Into<String>, value: T) -> Result<(), TaskError> {
        let value = serde_json::to_value(value)?;
        self.insert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.provenance.remove(key);
        self.data.remove(key)
    }

    /// Node id that last wrote `key`, if it was written by a task.
    pub fn written_by(&self, key: &str) -> Option<&str> {
        self.provenance.get(key).map(String::as_str)
    }

    pub fn data(&self) -> &HashMap<String, Value> {
        &self.data
    }

    pub fn into_data(self) -> HashMap<String, Value> {
        self.data
    }

    pub fn producers(&self) -> &ProducerIndex {
        &self.producers
    }

    /// Emit a domain event attributed to the current node. Best-effort.
    pub fn emit(&self, name: impl Into<String>, payload: Value) -> bool {
        let node_id = (!self.node_id.is_empty()).then(|| self.node_id.clone());
        self.emitter
            .emit(WorkflowEvent::new(name, payload, self.run_id.clone(), node_id))
    }

    pub fn emitter(&self) -> &EventEmitter {
        &self.emitter
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
