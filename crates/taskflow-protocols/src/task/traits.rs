//! Task trait definition.

use async_trait::async_trait;

use super::{
    validate_against_schema, TaskConfigSchema, TaskDefinition, TaskDisplayInfo, TaskOutput,
    ValidationResult,
};
use crate::context::WorkflowContext;
use crate::error::TaskError;

/// Core trait for workflow tasks.
///
/// Callers must run [`Task::validate`] and observe a valid result before
/// calling [`Task::execute`]. The trait does not enforce the order; tasks may
/// re-check invariants they depend on and fail with a [`TaskError`].
#[async_trait]
pub trait Task: Send + Sync {
    /// Returns the static task definition.
    fn definition(&self) -> &TaskDefinition;

    /// Unique task type identifier.
    fn task_type(&self) -> &str {
        &self.definition().task_type
    }

    /// Declarative description of the accepted configuration.
    fn schema(&self) -> &TaskConfigSchema {
        &self.definition().schema
    }

    /// Presentation metadata.
    fn display_info(&self) -> &TaskDisplayInfo {
        &self.definition().display
    }

    /// Check a configuration before execution.
    ///
    /// Must be pure: no I/O, no context access. The default implementation
    /// enforces the schema; tasks with cross-field rules extend it.
    fn validate(&self, input: &serde_json::Value) -> ValidationResult {
        validate_against_schema(self.schema(), input)
    }

    /// Context keys this configuration will read at execution time.
    fn context_reads(&self, _input: &serde_json::Value) -> Vec<String> {
        Vec::new()
    }

    /// Context keys this configuration will write at execution time.
    fn context_writes(&self, _input: &serde_json::Value) -> Vec<String> {
        self.definition().produces.clone()
    }

    /// Execute the task against the shared run context.
    async fn execute(
        &self,
        input: serde_json::Value,
        ctx: &mut WorkflowContext,
    ) -> Result<TaskOutput, TaskError>;
}

#[cfg(test)]
#[path = "traits_tests.rs"]
mod tests;
