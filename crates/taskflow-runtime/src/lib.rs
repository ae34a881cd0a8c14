//! # taskflow runtime
//!
//! Turns a [`WorkflowDefinition`] into a pipeline run: resolve every step
//! against a [`TaskRegistry`](taskflow_core::TaskRegistry), validate all of
//! them, then execute them in order against one fresh
//! [`WorkflowContext`](taskflow_protocols::WorkflowContext).

pub mod events;
pub mod registration;
pub mod report;
pub mod runner;
pub mod workflow;

pub use events::{EventPump, LogEventSink, MemoryEventSink};
pub use registration::{available_tasks, build_registry};
pub use report::{RunReport, StepReport, StepValidation, ValidationReport};
pub use runner::{ExecutionPlan, PipelineConfig, PipelineRunner, PlannedStep};
pub use workflow::{DefinitionError, TaskInvocation, WorkflowDefinition};
