//! CRM tasks for taskflow.
//!
//! Provides `hubspot-create-contact`, `hubspot-update-contact` and
//! `hubspot-add-note`. They need a [`CrmClient`](taskflow_protocols::CrmClient),
//! which embedders supply; without one the tasks are not registered.

mod pack;
mod tasks;

pub use pack::{crm_tasks, TASK_TYPES};
pub use tasks::{AddNoteTask, CreateContactTask, UpdateContactTask, CONTACT_PROCESSED_EVENT};
