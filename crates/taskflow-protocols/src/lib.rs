//! # taskflow protocols
//!
//! Core protocol definitions for the taskflow framework.
//! Contains the task contract and the value types that flow through it.
//!
//! ## Core Traits
//!
//! - [`Task`] - Contract every workflow operation implements
//! - [`HttpClient`] - HTTP integration consumed by HTTP tasks
//! - [`KeyValueStore`] - Key-value integration consumed by storage tasks
//! - [`CrmClient`] - CRM integration consumed by CRM tasks
//! - [`EventSink`] - Destination for events emitted during a run

pub mod context;
pub mod error;
pub mod event;
pub mod integration;
pub mod task;
pub mod types;

pub use context::{keys, ProducerIndex, WorkflowContext};
pub use error::{
    EventError, IntegrationError, StepValidationFailure, TaskError, WorkflowError,
};
pub use event::{EventEmitter, EventSink, WorkflowEvent};
pub use integration::{
    ContactProperties, CrmClient, CrmContact, CrmNote, HttpAuth, HttpClient, HttpMethod, HttpRequest,
    HttpResponse, IntegrationKind, Integrations, KeyValueStore,
};
pub use task::{
    PropertySchema, PropertyType, Task, TaskCategory, TaskConfigSchema, TaskDefinition,
    TaskDisplayInfo, TaskOutput, ValidationResult,
};
pub use types::*;
