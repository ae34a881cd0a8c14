//! Run and validation reports.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Outcome of one executed step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub node_id: String,
    pub task_type: String,
    pub output: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

/// Outcome of a successful pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub run_id: String,
    pub workflow_id: String,
    pub steps: Vec<StepReport>,
    /// Final context data.
    pub data: BTreeMap<String, Value>,
    /// Validation and context-flow warnings collected while planning.
    pub warnings: Vec<String>,
    /// Events that could not be handed to the event channel during this run.
    pub dropped_events: u64,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn step(&self, node_id: &str) -> Option<&StepReport> {
        self.steps.iter().find(|s| s.node_id == node_id)
    }
}

/// Static validation result for one step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepValidation {
    pub node_id: String,
    pub task_type: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl StepValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Static validation of a whole workflow, without failing fast.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub workflow_id: String,
    /// Structural problems with the definition itself.
    pub errors: Vec<String>,
    pub steps: Vec<StepValidation>,
    /// Context-flow warnings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.steps.iter().all(StepValidation::is_valid)
    }

    pub fn error_count(&self) -> usize {
        self.errors.len() + self.steps.iter().map(|s| s.errors.len()).sum::<usize>()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len() + self.steps.iter().map(|s| s.warnings.len()).sum::<usize>()
    }
}
