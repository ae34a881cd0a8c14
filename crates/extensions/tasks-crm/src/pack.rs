//! Task pack entry point.

use std::sync::Arc;

use taskflow_protocols::{CrmClient, Task};

use crate::tasks::{AddNoteTask, CreateContactTask, UpdateContactTask};

/// Task types provided by this pack.
pub const TASK_TYPES: [&str; 3] = [
    "hubspot-create-contact",
    "hubspot-update-contact",
    "hubspot-add-note",
];

/// Construct the CRM tasks over a shared client.
pub fn crm_tasks(client: Arc<dyn CrmClient>) -> Vec<Arc<dyn Task>> {
    vec![
        Arc::new(CreateContactTask::new(client.clone())),
        Arc::new(UpdateContactTask::new(client.clone())),
        Arc::new(AddNoteTask::new(client)),
    ]
}
