//! Task pack entry point.

use std::sync::Arc;

use taskflow_protocols::Task;

use crate::tasks::{DelayTask, EmitEventTask, SetDataTask, TransformTask};

/// Task types provided by this pack.
pub const TASK_TYPES: [&str; 4] = ["set-data", "transform", "emit-event", "delay"];

/// Construct every core task.
pub fn core_tasks() -> Vec<Arc<dyn Task>> {
    vec![
        Arc::new(SetDataTask::new()),
        Arc::new(TransformTask::new()),
        Arc::new(EmitEventTask::new()),
        Arc::new(DelayTask::new()),
    ]
}
