//! `kv-delete`: remove a key from the store.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use taskflow_protocols::task::validate_against_schema;
use taskflow_protocols::{
    IntegrationKind, KeyValueStore, Task, TaskCategory, TaskConfigSchema, TaskDefinition,
    TaskDisplayInfo, TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

use super::{key_of, key_property, validate_key};

pub struct KvDeleteTask {
    definition: TaskDefinition,
    store: Arc<dyn KeyValueStore>,
}

impl KvDeleteTask {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let schema = TaskConfigSchema::new("KV Delete", "Remove a key from the key-value store")
            .required_property("key", key_property())
            .example(json!({"key": "customer:42"}));

        let display = TaskDisplayInfo::new(TaskCategory::Storage, "KV Delete", "trash")
            .with_color("#f59e0b")
            .with_tags(["kv", "storage", "delete"])
            .requires(IntegrationKind::Kv);

        Self {
            definition: TaskDefinition::new("kv-delete", schema, display),
            store,
        }
    }
}

#[async_trait]
impl Task for KvDeleteTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_key(input, &mut result);
        result
    }

    async fn execute(&self, input: Value, _ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let key = key_of(&input)?;
        let deleted = self.store.delete(key).await?;
        Ok(TaskOutput::success(json!({ "key": key, "deleted": deleted })))
    }
}
