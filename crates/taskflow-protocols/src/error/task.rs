//! Task execution errors.

use std::time::Duration;

use thiserror::Error;

use super::IntegrationError;

/// Error raised from inside `Task::execute`.
///
/// The runner wraps it into [`super::WorkflowError::Execution`] together with
/// the failing node id, task type and original input.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing context key '{key}': expected it to be written by {producer} earlier in the workflow")]
    MissingContextKey { key: String, producer: String },

    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Integration error: {0}")]
    Integration(#[from] IntegrationError),

    #[error("Task timed out after {0:?}")]
    Timeout(Duration),

    #[error("Task execution was cancelled")]
    Cancelled,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
