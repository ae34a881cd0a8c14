//! `hubspot-create-contact`: create or upsert a CRM contact.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};

use taskflow_protocols::task::{is_email, str_field, validate_against_schema};
use taskflow_protocols::{
    keys, ContactProperties, CrmClient, IntegrationKind, PropertySchema, Task, TaskCategory,
    TaskConfigSchema, TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult,
    WorkflowContext,
};

/// Event emitted after a contact was created or updated.
pub const CONTACT_PROCESSED_EVENT: &str = "hubspot.contact.processed";

/// Config field to CRM property name.
const FIELD_PROPERTIES: [(&str, &str); 4] = [
    ("firstName", "firstname"),
    ("lastName", "lastname"),
    ("company", "company"),
    ("phone", "phone"),
];

pub struct CreateContactTask {
    definition: TaskDefinition,
    client: Arc<dyn CrmClient>,
}

impl CreateContactTask {
    pub fn new(client: Arc<dyn CrmClient>) -> Self {
        let schema = TaskConfigSchema::new(
            "Create HubSpot Contact",
            "Create a contact, or update the existing one with the same email",
        )
        .required_property(
            "email",
            PropertySchema::string()
                .title("Email")
                .format("email")
                .example("jane@example.com"),
        )
        .property("firstName", PropertySchema::string().title("First name"))
        .property("lastName", PropertySchema::string().title("Last name"))
        .property("company", PropertySchema::string().title("Company"))
        .property("phone", PropertySchema::string().title("Phone"))
        .property(
            "properties",
            PropertySchema::object()
                .title("Extra properties")
                .description("Additional CRM properties, by internal name")
                .example(json!({"lifecyclestage": "lead"})),
        )
        .property(
            "upsert",
            PropertySchema::boolean()
                .title("Upsert")
                .description("Update the contact if one with this email already exists")
                .default_value(true),
        )
        .example(json!({
            "email": "jane@example.com",
            "firstName": "Jane",
            "lastName": "Doe",
            "company": "Acme"
        }));

        let display = TaskDisplayInfo::new(TaskCategory::Crm, "Create Contact", "user-plus")
            .with_color("#ff7a59")
            .with_tags(["hubspot", "crm", "contact", "lead"])
            .requires(IntegrationKind::Crm);

        Self {
            definition: TaskDefinition::new("hubspot-create-contact", schema, display)
                .produces(keys::HUBSPOT_CONTACT),
            client,
        }
    }
}

fn contact_properties(input: &Value) -> ContactProperties {
    let mut properties = ContactProperties::new();
    if let Some(extra) = input.get("properties").and_then(Value::as_object) {
        for (name, value) in extra {
            properties.insert(name.clone(), value.clone());
        }
    }
    for (field, property) in FIELD_PROPERTIES {
        if let Some(value) = str_field(input, field) {
            properties.insert(property.to_string(), json!(value));
        }
    }
    properties
}

#[async_trait]
impl Task for CreateContactTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);

        if let Some(email) = str_field(input, "email") {
            if !is_email(email) {
                result.add_error(format!("email: '{}' is not a valid email address", email));
            }
        }

        if let Some(extra) = input.get("properties").and_then(Value::as_object) {
            if extra.contains_key("email") {
                result.add_warning("properties.email: overridden by the email field");
            }
            for (field, property) in FIELD_PROPERTIES {
                if input.get(field).is_some() && extra.contains_key(property) {
                    result.add_warning(format!(
                        "properties.{}: overridden by the {} field",
                        property, field
                    ));
                }
            }
        }

        if str_field(input, "firstName").is_none() && str_field(input, "lastName").is_none() {
            result.add_warning("Neither firstName nor lastName is set, the contact will be nameless");
        }

        result
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let email = str_field(&input, "email")
            .filter(|e| is_email(e))
            .ok_or_else(|| TaskError::InvalidInput("a valid email is required".to_string()))?;
        let upsert = input.get("upsert").and_then(Value::as_bool).unwrap_or(true);
        let properties = contact_properties(&input);

        let existing = if upsert {
            self.client.find_contact_by_email(email).await?
        } else {
            None
        };

        let (contact, created) = match existing {
            Some(existing) => {
                debug!(contact_id = %existing.id, "Contact exists, updating");
                (self.client.update_contact(&existing.id, properties).await?, false)
            }
            None => (self.client.create_contact(email, properties).await?, true),
        };

        info!(
            provider = %self.client.provider(),
            contact_id = %contact.id,
            created,
            "Contact processed"
        );

        let contact_json = serde_json::to_value(&contact)?;
        ctx.insert(keys::HUBSPOT_CONTACT, contact_json.clone());
        ctx.emit(
            CONTACT_PROCESSED_EVENT,
            json!({ "contactId": contact.id, "email": contact.email, "created": created }),
        );

        Ok(TaskOutput::success(json!({ "contact": contact_json, "created": created }))
            .with_message(if created { "Contact created" } else { "Contact updated" }))
    }
}
