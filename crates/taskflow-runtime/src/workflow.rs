//! Workflow definitions.
//!
//! A workflow is an ordered list of task invocations. There is no edge
//! language: steps run strictly in the order they are listed.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("Failed to read workflow file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON workflow: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML workflow: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported workflow file extension: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("Workflow '{0}' has no steps")]
    NoSteps(String),

    #[error("Step {index} has an empty id")]
    EmptyNodeId { index: usize },

    #[error("Step '{0}' has an empty task type")]
    EmptyTaskType(String),

    #[error("Duplicate step id '{0}'")]
    DuplicateNodeId(String),
}

/// One step of a workflow: a registered task type plus its configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInvocation {
    /// Node id, unique within the workflow.
    pub id: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default = "empty_config")]
    pub config: Value,
}

fn empty_config() -> Value {
    Value::Object(Default::default())
}

impl TaskInvocation {
    pub fn new(id: impl Into<String>, task_type: impl Into<String>, config: Value) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            config,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<TaskInvocation>,
}

impl WorkflowDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            steps: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a step.
    pub fn step(mut self, id: impl Into<String>, task_type: impl Into<String>, config: Value) -> Self {
        self.steps.push(TaskInvocation::new(id, task_type, config));
        self
    }

    pub fn from_json(content: &str) -> Result<Self, DefinitionError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yml::from_str(content)?)
    }

    /// Load a definition, choosing the parser by file extension.
    pub fn load(path: &Path) -> Result<Self, DefinitionError> {
        let content = std::fs::read_to_string(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Err(DefinitionError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Structural checks that need no registry.
    pub fn check(&self) -> Result<(), DefinitionError> {
        if self.steps.is_empty() {
            return Err(DefinitionError::NoSteps(self.id.clone()));
        }

        let mut seen = HashSet::new();
        for (index, step) in self.steps.iter().enumerate() {
            if step.id.trim().is_empty() {
                return Err(DefinitionError::EmptyNodeId { index });
            }
            if step.task_type.trim().is_empty() {
                return Err(DefinitionError::EmptyTaskType(step.id.clone()));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(DefinitionError::DuplicateNodeId(step.id.clone()));
            }
        }
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
