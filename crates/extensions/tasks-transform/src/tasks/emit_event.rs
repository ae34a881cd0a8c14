//! `emit-event`: publish a domain event from a workflow.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{debug, warn};

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    PropertySchema, Task, TaskCategory, TaskConfigSchema, TaskDefinition, TaskDisplayInfo,
    TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

static EVENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("valid event name regex")
});

/// Hands an event to the run's emitter. Delivery is best-effort.
pub struct EmitEventTask {
    definition: TaskDefinition,
}

impl EmitEventTask {
    pub fn new() -> Self {
        let schema = TaskConfigSchema::new(
            "Emit Event",
            "Publish a named event with a payload to the configured event sink",
        )
        .required_property(
            "event",
            PropertySchema::string()
                .title("Event name")
                .description("Dotted event name")
                .example("order.completed"),
        )
        .property(
            "payload",
            PropertySchema::object()
                .title("Payload")
                .description("Literal event payload")
                .default_value(json!({})),
        )
        .property(
            "payloadFrom",
            PropertySchema::string()
                .title("Payload from context")
                .description("Context key whose value becomes the payload")
                .example("hubspotContact"),
        )
        .example(json!({"event": "order.completed", "payload": {"orderId": "A-100"}}));

        let display = TaskDisplayInfo::new(TaskCategory::Core, "Emit Event", "send")
            .with_color("#0ea5e9")
            .with_tags(["event", "notify", "bus"]);

        Self {
            definition: TaskDefinition::new("emit-event", schema, display),
        }
    }
}

impl Default for EmitEventTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for EmitEventTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);

        if let Some(event) = str_field(input, "event") {
            if !EVENT_NAME.is_match(event) {
                result.add_error(format!(
                    "event: '{}' must be dot-separated words of letters, digits, '-' or '_'",
                    event
                ));
            }
        }

        if input.get("payload").is_some() && input.get("payloadFrom").is_some() {
            result.add_error("payload and payloadFrom are mutually exclusive");
        }

        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        str_field(input, "payloadFrom")
            .map(|k| vec![k.to_string()])
            .unwrap_or_default()
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let event = str_field(&input, "event")
            .ok_or_else(|| TaskError::InvalidInput("event is required".to_string()))?;

        let payload = match str_field(&input, "payloadFrom") {
            Some(key) => ctx.require(key)?.clone(),
            None => input.get("payload").cloned().unwrap_or_else(|| json!({})),
        };

        let delivered = ctx.emit(event, payload);
        if delivered {
            debug!(event = %event, "Event handed to emitter");
        } else {
            warn!(event = %event, node_id = %ctx.node_id(), "Event was not delivered");
        }

        Ok(TaskOutput::success(json!({ "event": event, "delivered": delivered })))
    }
}
