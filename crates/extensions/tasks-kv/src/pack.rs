//! Task pack entry point.

use std::sync::Arc;

use taskflow_protocols::{KeyValueStore, Task};

use crate::tasks::{KvDeleteTask, KvGetTask, KvSetTask};

/// Task types provided by this pack.
pub const TASK_TYPES: [&str; 3] = ["kv-get", "kv-set", "kv-delete"];

/// Construct the key-value tasks over a shared store.
pub fn kv_tasks(store: Arc<dyn KeyValueStore>) -> Vec<Arc<dyn Task>> {
    vec![
        Arc::new(KvGetTask::new(store.clone())),
        Arc::new(KvSetTask::new(store.clone())),
        Arc::new(KvDeleteTask::new(store)),
    ]
}
