//! Task pack entry point.

use std::sync::Arc;

use taskflow_protocols::{HttpClient, Task};

use crate::tasks::{HttpGetTask, HttpRequestTask};

/// Task types provided by this pack.
pub const TASK_TYPES: [&str; 2] = ["http-request", "http-get"];

/// Construct the HTTP tasks over a shared client.
pub fn http_tasks(client: Arc<dyn HttpClient>) -> Vec<Arc<dyn Task>> {
    vec![
        Arc::new(HttpRequestTask::new(client.clone())),
        Arc::new(HttpGetTask::new(client)),
    ]
}
