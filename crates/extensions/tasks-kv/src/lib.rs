//! Key-value tasks for taskflow.
//!
//! Provides `kv-get`, `kv-set` and `kv-delete` over any
//! [`KeyValueStore`](taskflow_protocols::KeyValueStore), plus
//! [`InMemoryKvStore`], the store the CLI wires in.

mod pack;
mod store;
mod tasks;

pub use pack::{kv_tasks, TASK_TYPES};
pub use store::InMemoryKvStore;
pub use tasks::{KvDeleteTask, KvGetTask, KvSetTask, MAX_TTL_HOURS};
