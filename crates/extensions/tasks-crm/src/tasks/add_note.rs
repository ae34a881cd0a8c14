//! `hubspot-add-note`: attach a note to a contact.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    keys, CrmClient, IntegrationKind, PropertySchema, Task, TaskCategory, TaskConfigSchema,
    TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

use super::{contact_id_property, contact_reads, resolve_contact_id, validate_contact_id};

const MAX_NOTE_CHARS: usize = 65_536;

pub struct AddNoteTask {
    definition: TaskDefinition,
    client: Arc<dyn CrmClient>,
}

impl AddNoteTask {
    pub fn new(client: Arc<dyn CrmClient>) -> Self {
        let schema = TaskConfigSchema::new("Add HubSpot Note", "Attach a note to a contact")
            .property("contactId", contact_id_property())
            .required_property(
                "body",
                PropertySchema::string()
                    .title("Note")
                    .description("Note text")
                    .example("Signed up through the pricing page"),
            )
            .example(json!({"body": "Requested a demo"}));

        let display = TaskDisplayInfo::new(TaskCategory::Crm, "Add Note", "sticky-note")
            .with_color("#ff7a59")
            .with_tags(["hubspot", "crm", "note", "activity"])
            .requires(IntegrationKind::Crm);

        Self {
            definition: TaskDefinition::new("hubspot-add-note", schema, display)
                .produces(keys::HUBSPOT_NOTE),
            client,
        }
    }
}

#[async_trait]
impl Task for AddNoteTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_contact_id(input, &mut result);
        if let Some(body) = str_field(input, "body") {
            if body.trim().is_empty() {
                result.add_error("body: cannot be empty");
            } else if body.chars().count() > MAX_NOTE_CHARS {
                result.add_error(format!("body: longer than {} characters", MAX_NOTE_CHARS));
            }
        }
        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        contact_reads(input)
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let body = str_field(&input, "body")
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| TaskError::InvalidInput("body is required".to_string()))?;
        let contact_id = resolve_contact_id(&input, ctx)?;

        let note = self.client.add_note(&contact_id, body).await?;
        let note_json = serde_json::to_value(&note)?;
        ctx.insert(keys::HUBSPOT_NOTE, note_json.clone());

        Ok(TaskOutput::success(json!({ "note": note_json })))
    }
}
