//! `kv-set`: write a value to the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    keys, IntegrationKind, KeyValueStore, PropertySchema, Task, TaskCategory, TaskConfigSchema,
    TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

use super::{key_of, key_property, validate_key};

const HOURS_PER_YEAR: f64 = 24.0 * 365.0;
/// Upper bound on `ttlHours`: ten years.
pub const MAX_TTL_HOURS: f64 = HOURS_PER_YEAR * 10.0;

pub struct KvSetTask {
    definition: TaskDefinition,
    store: Arc<dyn KeyValueStore>,
}

impl KvSetTask {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let schema = TaskConfigSchema::new("KV Set", "Write a value to the key-value store")
            .required_property("key", key_property())
            .property(
                "value",
                PropertySchema::any()
                    .title("Value")
                    .description("Literal value to store"),
            )
            .property(
                "valueFrom",
                PropertySchema::string()
                    .title("Value from context")
                    .description("Context key whose value is stored")
                    .example(keys::HTTP_RESPONSE),
            )
            .property(
                "ttlHours",
                PropertySchema::number()
                    .title("TTL (hours)")
                    .description("Expire the entry after this many hours; omit to keep it")
                    .range(0.0, MAX_TTL_HOURS)
                    .example(24),
            )
            .example(json!({"key": "customer:42", "valueFrom": "hubspotContact", "ttlHours": 720}));

        let display = TaskDisplayInfo::new(TaskCategory::Storage, "KV Set", "save")
            .with_color("#f59e0b")
            .with_tags(["kv", "storage", "write", "cache"])
            .requires(IntegrationKind::Kv);

        Self {
            definition: TaskDefinition::new("kv-set", schema, display),
            store,
        }
    }
}

#[async_trait]
impl Task for KvSetTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_key(input, &mut result);

        match (input.get("value").is_some(), input.get("valueFrom").is_some()) {
            (false, false) => result.add_error("value: either value or valueFrom is required"),
            (true, true) => result.add_error("value and valueFrom are mutually exclusive"),
            _ => {}
        }

        if let Some(ttl) = input.get("ttlHours").and_then(Value::as_f64) {
            if ttl == 0.0 {
                result.add_error("ttlHours: must be greater than 0, omit it to keep the entry");
            } else if ttl > HOURS_PER_YEAR {
                result.add_warning(format!("ttlHours: {} is more than a year", ttl));
            }
        }

        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        str_field(input, "valueFrom")
            .map(|k| vec![k.to_string()])
            .unwrap_or_default()
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let key = key_of(&input)?;

        let value = match (input.get("value"), str_field(&input, "valueFrom")) {
            (Some(value), None) => value.clone(),
            (None, Some(from)) => ctx.require(from)?.clone(),
            _ => {
                return Err(TaskError::InvalidInput(
                    "exactly one of value or valueFrom is required".to_string(),
                ));
            }
        };

        let ttl = match input.get("ttlHours").and_then(Value::as_f64) {
            Some(hours) if hours > 0.0 && hours <= MAX_TTL_HOURS => {
                let ttl = Duration::try_from_secs_f64(hours * 3600.0).map_err(|e| {
                    TaskError::InvalidInput(format!("invalid ttlHours {}: {}", hours, e))
                })?;
                Some(ttl)
            }
            Some(hours) => {
                return Err(TaskError::InvalidInput(format!(
                    "invalid ttlHours {}, expected 0 < ttlHours <= {}",
                    hours, MAX_TTL_HOURS
                )));
            }
            None => None,
        };

        debug!(key = %key, ttl = ?ttl, "kv-set");
        self.store.set(key, value, ttl).await?;

        Ok(TaskOutput::success(json!({
            "key": key,
            "ttlSeconds": ttl.map(|d| d.as_secs()),
        })))
    }
}
