//! HTTP tasks for taskflow.
//!
//! Provides the `http-request` and `http-get` tasks, which need an
//! [`HttpClient`](taskflow_protocols::HttpClient), and [`ReqwestHttpClient`],
//! the client the CLI wires in.

mod client;
mod pack;
mod tasks;

pub use client::ReqwestHttpClient;
pub use pack::{http_tasks, TASK_TYPES};
pub use tasks::{HttpGetTask, HttpRequestTask};
