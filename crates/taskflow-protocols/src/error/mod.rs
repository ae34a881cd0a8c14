//! Error types for the taskflow protocol layer.
//!
//! Three kinds reach a workflow author: validation failures (nothing ran),
//! execution failures (a task failed mid-`execute`) and configuration
//! failures (the task type is not available in this deployment). All three
//! are variants of [`WorkflowError`].

mod event;
mod integration;
mod task;
mod workflow;

pub use event::*;
pub use integration::*;
pub use task::*;
pub use workflow::*;
