//! `kv-get`: read a value from the store into the context.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    keys, IntegrationKind, KeyValueStore, PropertySchema, Task, TaskCategory, TaskConfigSchema,
    TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

use super::{key_of, key_property, validate_key};

pub struct KvGetTask {
    definition: TaskDefinition,
    store: Arc<dyn KeyValueStore>,
}

impl KvGetTask {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let schema = TaskConfigSchema::new(
            "KV Get",
            "Read a value from the key-value store into the workflow context",
        )
        .required_property("key", key_property())
        .property(
            "to",
            PropertySchema::string()
                .title("Target key")
                .description("Context key to write the value to")
                .default_value(keys::KV_VALUE),
        )
        .property(
            "default",
            PropertySchema::any()
                .title("Default")
                .description("Value used when the key is absent"),
        )
        .property(
            "required",
            PropertySchema::boolean()
                .title("Required")
                .description("Fail the step when the key is absent")
                .default_value(false),
        )
        .example(json!({"key": "customer:42", "to": "customer"}));

        let display = TaskDisplayInfo::new(TaskCategory::Storage, "KV Get", "key")
            .with_color("#f59e0b")
            .with_tags(["kv", "storage", "read"])
            .requires(IntegrationKind::Kv);

        Self {
            definition: TaskDefinition::new("kv-get", schema, display).produces(keys::KV_VALUE),
            store,
        }
    }
}

#[async_trait]
impl Task for KvGetTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_key(input, &mut result);

        if str_field(input, "to").is_some_and(|t| t.trim().is_empty()) {
            result.add_error("to: cannot be empty");
        }
        let required = input.get("required").and_then(Value::as_bool).unwrap_or(false);
        if required && input.get("default").is_some() {
            result.add_warning("default: never used when required is true");
        }
        result
    }

    fn context_writes(&self, input: &Value) -> Vec<String> {
        vec![str_field(input, "to").unwrap_or(keys::KV_VALUE).to_string()]
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let key = key_of(&input)?;
        let to = str_field(&input, "to").unwrap_or(keys::KV_VALUE);
        let required = input.get("required").and_then(Value::as_bool).unwrap_or(false);

        let stored = self.store.get(key).await?;
        let found = stored.is_some();
        debug!(key = %key, found, "kv-get");

        let value = match stored {
            Some(value) => value,
            None if required => {
                return Err(TaskError::ExecutionFailed(format!("key '{}' not found in store", key)));
            }
            None => input.get("default").cloned().unwrap_or(Value::Null),
        };

        ctx.insert(to, value.clone());
        Ok(TaskOutput::success(json!({ "key": key, "found": found, "value": value })))
    }
}
