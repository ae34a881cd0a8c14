//! # taskflow core
//!
//! Registry side of the taskflow framework.
//!
//! ## Components
//!
//! - [`TaskRegistry`] - Lookup table from task type to task instance
//! - [`BaseRegistry`] - Generic concurrent registry the task registry is built on

pub mod registry;

pub use registry::{BaseRegistry, Registerable, TaskRegistry};
