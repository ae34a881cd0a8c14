//! `transform`: copy a value (or a part of it) between context keys.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    PropertySchema, Task, TaskCategory, TaskConfigSchema, TaskDefinition, TaskDisplayInfo,
    TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

/// Reads `from`, optionally narrows it with a JSON pointer, writes `to`.
pub struct TransformTask {
    definition: TaskDefinition,
}

impl TransformTask {
    pub fn new() -> Self {
        let schema = TaskConfigSchema::new(
            "Transform",
            "Copy a context value, or a field inside it, to another context key",
        )
        .required_property(
            "from",
            PropertySchema::string()
                .title("Source key")
                .description("Context key written by an earlier task")
                .example("httpResponse"),
        )
        .required_property(
            "to",
            PropertySchema::string()
                .title("Target key")
                .description("Context key to write")
                .example("customer"),
        )
        .property(
            "path",
            PropertySchema::string()
                .title("JSON pointer")
                .description("RFC 6901 pointer into the source value, e.g. /data/0/email")
                .example("/data/customer"),
        )
        .property(
            "default",
            PropertySchema::any()
                .title("Default")
                .description("Value written when the source key or pointer is missing"),
        )
        .example(json!({"from": "httpResponse", "path": "/data/customer", "to": "customer"}));

        let display = TaskDisplayInfo::new(TaskCategory::Data, "Transform", "shuffle")
            .with_color("#6366f1")
            .with_tags(["data", "json", "pointer", "map"]);

        Self {
            definition: TaskDefinition::new("transform", schema, display),
        }
    }
}

impl Default for TransformTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for TransformTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);

        for field in ["from", "to"] {
            if str_field(input, field).is_some_and(|v| v.trim().is_empty()) {
                result.add_error(format!("{}: cannot be empty", field));
            }
        }

        if let Some(path) = str_field(input, "path") {
            if !path.is_empty() && !path.starts_with('/') {
                result.add_error(format!(
                    "path: '{}' is not a JSON pointer, it must start with '/'",
                    path
                ));
            }
        }

        if let (Some(from), Some(to)) = (str_field(input, "from"), str_field(input, "to")) {
            if from == to && str_field(input, "path").is_none_or(str::is_empty) {
                result.add_warning("from and to are the same key, the step has no effect");
            }
        }

        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        str_field(input, "from").map(|k| vec![k.to_string()]).unwrap_or_default()
    }

    fn context_writes(&self, input: &Value) -> Vec<String> {
        str_field(input, "to").map(|k| vec![k.to_string()]).unwrap_or_default()
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let from = str_field(&input, "from")
            .ok_or_else(|| TaskError::InvalidInput("from is required".to_string()))?;
        let to = str_field(&input, "to")
            .ok_or_else(|| TaskError::InvalidInput("to is required".to_string()))?;
        let path = str_field(&input, "path").unwrap_or("");
        let default = input.get("default");

        let source = match (ctx.get_value(from), default) {
            (Some(value), _) => Some(value),
            (None, Some(_)) => None,
            (None, None) => Some(ctx.require(from)?),
        };

        let value = match source.and_then(|v| v.pointer(path)) {
            Some(found) => found.clone(),
            None => match default {
                Some(default) => default.clone(),
                None => {
                    return Err(TaskError::ExecutionFailed(format!(
                        "path '{}' not found in context key '{}'",
                        path, from
                    )));
                }
            },
        };

        debug!(from = %from, to = %to, path = %path, "transform copied value");
        ctx.insert(to, value.clone());

        Ok(TaskOutput::success(json!({ "key": to, "value": value })))
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
