//! `set-data`: write literal values into the workflow context.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::{
    PropertySchema, Task, TaskCategory, TaskConfigSchema, TaskDefinition, TaskDisplayInfo,
    TaskError, TaskOutput, ValidationResult, WorkflowContext,
};
use taskflow_protocols::task::validate_against_schema;

/// Seeds the context with fixed values, typically at the start of a pipeline.
pub struct SetDataTask {
    definition: TaskDefinition,
}

impl SetDataTask {
    pub fn new() -> Self {
        let schema = TaskConfigSchema::new(
            "Set Data",
            "Write a set of literal values into the workflow context",
        )
        .required_property(
            "values",
            PropertySchema::object()
                .title("Values")
                .description("Object whose entries are written to the context, key by key")
                .example(json!({"customerEmail": "jane@example.com"})),
        )
        .example(json!({"values": {"customerEmail": "jane@example.com", "plan": "pro"}}));

        let display = TaskDisplayInfo::new(TaskCategory::Data, "Set Data", "database")
            .with_color("#6366f1")
            .with_tags(["data", "context", "constant"]);

        Self {
            definition: TaskDefinition::new("set-data", schema, display),
        }
    }
}

impl Default for SetDataTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for SetDataTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        if let Some(values) = input.get("values").and_then(Value::as_object) {
            if values.is_empty() {
                result.add_warning("values: empty object, nothing will be written");
            }
            if values.keys().any(|k| k.trim().is_empty()) {
                result.add_error("values: keys cannot be empty");
            }
        }
        result
    }

    fn context_writes(&self, input: &Value) -> Vec<String> {
        input
            .get("values")
            .and_then(Value::as_object)
            .map(|values| values.keys().cloned().collect())
            .unwrap_or_default()
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let values = input
            .get("values")
            .and_then(Value::as_object)
            .ok_or_else(|| TaskError::InvalidInput("values must be an object".to_string()))?;

        let mut written = Vec::with_capacity(values.len());
        for (key, value) in values {
            ctx.insert(key.clone(), value.clone());
            written.push(key.clone());
        }
        debug!(node_id = %ctx.node_id(), keys = ?written, "set-data wrote context keys");

        Ok(TaskOutput::success(json!({ "written": written }))
            .with_message(format!("Wrote {} context key(s)", written.len())))
    }
}
