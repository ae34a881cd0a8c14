//! Registries.

mod base;
mod task;

pub use base::{BaseRegistry, Registerable};
pub use task::TaskRegistry;
