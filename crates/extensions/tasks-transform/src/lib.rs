//! Core tasks for taskflow.
//!
//! Provides `set-data`, `transform`, `emit-event` and `delay`. None of them
//! needs an integration, so they are registered in every deployment.

mod pack;
mod tasks;

pub use pack::{core_tasks, TASK_TYPES};
pub use tasks::{DelayTask, EmitEventTask, SetDataTask, TransformTask};
