//! `hubspot-update-contact`: change properties on an existing contact.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::validate_against_schema;
use taskflow_protocols::{
    keys, ContactProperties, CrmClient, IntegrationKind, PropertySchema, Task, TaskCategory,
    TaskConfigSchema, TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult,
    WorkflowContext,
};

use super::{contact_id_property, contact_reads, resolve_contact_id, validate_contact_id};

pub struct UpdateContactTask {
    definition: TaskDefinition,
    client: Arc<dyn CrmClient>,
}

impl UpdateContactTask {
    pub fn new(client: Arc<dyn CrmClient>) -> Self {
        let schema = TaskConfigSchema::new(
            "Update HubSpot Contact",
            "Update properties of an existing contact",
        )
        .property("contactId", contact_id_property())
        .required_property(
            "properties",
            PropertySchema::object()
                .title("Properties")
                .description("CRM properties to set, by internal name")
                .example(json!({"lifecyclestage": "customer"})),
        )
        .example(json!({"properties": {"lifecyclestage": "customer"}}));

        let display = TaskDisplayInfo::new(TaskCategory::Crm, "Update Contact", "user-pen")
            .with_color("#ff7a59")
            .with_tags(["hubspot", "crm", "contact"])
            .requires(IntegrationKind::Crm);

        Self {
            definition: TaskDefinition::new("hubspot-update-contact", schema, display)
                .produces(keys::HUBSPOT_CONTACT),
            client,
        }
    }
}

#[async_trait]
impl Task for UpdateContactTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_contact_id(input, &mut result);
        if input
            .get("properties")
            .and_then(Value::as_object)
            .is_some_and(|p| p.is_empty())
        {
            result.add_error("properties: at least one property is required");
        }
        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        contact_reads(input)
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let contact_id = resolve_contact_id(&input, ctx)?;
        let properties: ContactProperties = input
            .get("properties")
            .and_then(Value::as_object)
            .filter(|p| !p.is_empty())
            .map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .ok_or_else(|| TaskError::InvalidInput("properties must be a non-empty object".to_string()))?;

        debug!(contact_id = %contact_id, count = properties.len(), "Updating contact");
        let contact = self.client.update_contact(&contact_id, properties).await?;

        let contact_json = serde_json::to_value(&contact)?;
        ctx.insert(keys::HUBSPOT_CONTACT, contact_json.clone());

        Ok(TaskOutput::success(json!({ "contact": contact_json })))
    }
}
