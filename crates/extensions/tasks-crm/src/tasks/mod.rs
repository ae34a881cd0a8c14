//! CRM task implementations.

mod add_note;
mod create_contact;
mod update_contact;

pub use add_note::AddNoteTask;
pub use create_contact::{CreateContactTask, CONTACT_PROCESSED_EVENT};
pub use update_contact::UpdateContactTask;

use serde_json::Value;

use taskflow_protocols::task::str_field;
use taskflow_protocols::{keys, PropertySchema, TaskError, ValidationResult, WorkflowContext};

pub(crate) fn contact_id_property() -> PropertySchema {
    PropertySchema::string()
        .title("Contact ID")
        .description("Defaults to the id of hubspotContact written by an earlier HubSpot step")
        .example("51")
}

pub(crate) fn validate_contact_id(input: &Value, result: &mut ValidationResult) {
    if str_field(input, "contactId").is_some_and(|id| id.trim().is_empty()) {
        result.add_error("contactId: cannot be empty");
    }
}

/// Context keys read when no explicit contact id is configured.
pub(crate) fn contact_reads(input: &Value) -> Vec<String> {
    if str_field(input, "contactId").is_some() {
        Vec::new()
    } else {
        vec![keys::HUBSPOT_CONTACT.to_string()]
    }
}

/// Explicit `contactId`, else the id of the contact an earlier step wrote.
pub(crate) fn resolve_contact_id(input: &Value, ctx: &WorkflowContext) -> Result<String, TaskError> {
    if let Some(id) = str_field(input, "contactId") {
        return Ok(id.to_string());
    }

    let contact = ctx.require(keys::HUBSPOT_CONTACT)?;
    match contact.get("id") {
        Some(Value::String(id)) if !id.is_empty() => Ok(id.clone()),
        Some(Value::Number(id)) => Ok(id.to_string()),
        _ => Err(TaskError::ExecutionFailed(format!(
            "context key '{}' has no contact id; set contactId or run hubspot-create-contact first",
            keys::HUBSPOT_CONTACT
        ))),
    }
}

#[cfg(test)]
#[path = "crm_tests.rs"]
mod tests;
