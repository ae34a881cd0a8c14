//! `delay`: pause the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::validate_against_schema;
use taskflow_protocols::{
    PropertySchema, Task, TaskCategory, TaskConfigSchema, TaskDefinition, TaskDisplayInfo,
    TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

/// Longest accepted pause.
pub const MAX_DELAY_MS: u64 = 300_000;

const LONG_DELAY_MS: u64 = 60_000;

pub struct DelayTask {
    definition: TaskDefinition,
}

impl DelayTask {
    pub fn new() -> Self {
        let schema = TaskConfigSchema::new("Delay", "Wait before running the next step")
            .required_property(
                "milliseconds",
                PropertySchema::integer()
                    .title("Milliseconds")
                    .description("How long to wait")
                    .range(0.0, MAX_DELAY_MS as f64)
                    .example(1000),
            )
            .example(json!({"milliseconds": 1000}));

        let display = TaskDisplayInfo::new(TaskCategory::Core, "Delay", "clock")
            .with_color("#64748b")
            .with_tags(["wait", "sleep", "timer"]);

        Self {
            definition: TaskDefinition::new("delay", schema, display),
        }
    }
}

impl Default for DelayTask {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Task for DelayTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        if let Some(ms) = input.get("milliseconds").and_then(Value::as_u64) {
            if ms > LONG_DELAY_MS && ms <= MAX_DELAY_MS {
                result.add_warning(format!(
                    "milliseconds: {} holds the pipeline for over a minute",
                    ms
                ));
            }
        }
        result
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let ms = input
            .get("milliseconds")
            .and_then(Value::as_u64)
            .ok_or_else(|| TaskError::InvalidInput("milliseconds must be a non-negative integer".to_string()))?
            .min(MAX_DELAY_MS);

        debug!(node_id = %ctx.node_id(), ms, "Delaying pipeline");
        let token = ctx.cancellation().clone();

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(ms)) => {}
            _ = token.cancelled() => return Err(TaskError::Cancelled),
        }

        Ok(TaskOutput::success(json!({ "waitedMs": ms })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;

    #[test]
    fn test_validate_requires_milliseconds() {
        let task = DelayTask::new();
        let result = task.validate(&json!({}));
        assert!(!result.is_valid());
        assert!(result.errors().iter().any(|e| e.contains("milliseconds")));
    }

    #[test]
    fn test_validate_bounds() {
        let task = DelayTask::new();
        assert!(task.validate(&json!({"milliseconds": 0})).is_valid());
        assert!(task.validate(&json!({"milliseconds": 300000})).is_valid());
        assert!(!task.validate(&json!({"milliseconds": 300001})).is_valid());
        assert!(!task.validate(&json!({"milliseconds": -1})).is_valid());
        assert!(!task.validate(&json!({"milliseconds": "10"})).is_valid());
    }

    #[test]
    fn test_validate_long_delay_warns() {
        let task = DelayTask::new();
        let result = task.validate(&json!({"milliseconds": 120000}));
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_execute_waits() {
        let task = DelayTask::new();
        let mut ctx = WorkflowContext::new("run-1");
        let start = tokio::time::Instant::now();

        let output = task
            .execute(json!({"milliseconds": 5000}), &mut ctx)
            .await
            .unwrap();

        assert_eq!(output.data["waitedMs"], 5000);
        assert!(start.elapsed() >= Duration::from_millis(5000));
    }

    #[tokio::test]
    async fn test_execute_cancelled() {
        let task = DelayTask::new();
        let token = CancellationToken::new();
        let mut ctx = WorkflowContext::new("run-1").with_cancellation(token.clone());
        token.cancel();

        let err = task
            .execute(json!({"milliseconds": 300000}), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskError::Cancelled));
    }
}
