//! Task definition types.

use serde::{Deserialize, Serialize};

use super::{TaskConfigSchema, TaskDisplayInfo};

/// Static definition of a task type.
///
/// Created once when the task is constructed and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinition {
    /// Unique identifier for the task type.
    #[serde(rename = "type")]
    pub task_type: String,

    /// Accepted configuration.
    pub schema: TaskConfigSchema,

    /// UI-facing metadata.
    pub display: TaskDisplayInfo,

    /// Context keys written on success, by convention.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
}

impl TaskDefinition {
    /// Create a new task definition.
    pub fn new(
        task_type: impl Into<String>,
        schema: TaskConfigSchema,
        display: TaskDisplayInfo,
    ) -> Self {
        Self {
            task_type: task_type.into(),
            schema,
            display,
            produces: Vec::new(),
        }
    }

    /// Declare a context key this task writes.
    pub fn produces(mut self, key: impl Into<String>) -> Self {
        self.produces.push(key.into());
        self
    }
}
