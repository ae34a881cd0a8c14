//! Errors surfaced to the workflow author by the pipeline runner.

use serde::Serialize;
use thiserror::Error;

use super::TaskError;

/// All validation errors reported for one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidationFailure {
    pub node_id: String,
    pub task_type: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Invalid workflow definition: {0}")]
    InvalidDefinition(String),

    /// The requested task type is not registered, usually because its
    /// integration was not configured.
    #[error("Task type '{task_type}' requested by node '{node_id}' is not available in this deployment")]
    Configuration { node_id: String, task_type: String },

    #[error("Workflow validation failed: {}", describe_failures(.0))]
    Validation(Vec<StepValidationFailure>),

    #[error("Task '{task_type}' failed at node '{node_id}': {source}")]
    Execution {
        node_id: String,
        task_type: String,
        input: serde_json::Value,
        #[source]
        source: TaskError,
    },

    #[error("Workflow cancelled at node '{node_id}'")]
    Cancelled { node_id: String },
}

impl WorkflowError {
    /// Node the error is attributed to, if any.
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Configuration { node_id, .. }
            | Self::Execution { node_id, .. }
            | Self::Cancelled { node_id } => Some(node_id),
            Self::Validation(failures) => failures.first().map(|f| f.node_id.as_str()),
            Self::InvalidDefinition(_) => None,
        }
    }

    /// Task type the error is attributed to, if any.
    pub fn task_type(&self) -> Option<&str> {
        match self {
            Self::Configuration { task_type, .. } | Self::Execution { task_type, .. } => {
                Some(task_type)
            }
            Self::Validation(failures) => failures.first().map(|f| f.task_type.as_str()),
            Self::InvalidDefinition(_) | Self::Cancelled { .. } => None,
        }
    }

    /// Short machine-readable kind, used in reports and events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDefinition(_) => "invalid_definition",
            Self::Configuration { .. } => "configuration",
            Self::Validation(_) => "validation",
            Self::Execution { .. } => "execution",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

fn describe_failures(failures: &[StepValidationFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("[{} ({})] {}", f.node_id, f.task_type, f.errors.join("; ")))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
