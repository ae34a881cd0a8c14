//! Task execution output types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Metadata;

/// Output of a successful task execution.
///
/// Failures are reported as `Err(TaskError)`, never as an output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Whether the execution was successful.
    pub success: bool,
    /// Structured output.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Human-readable summary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Additional metadata about the execution.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: Metadata,
}

impl TaskOutput {
    /// Create a successful output with structured data.
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data,
            message: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a human-readable summary.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Add metadata to the output.
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}
