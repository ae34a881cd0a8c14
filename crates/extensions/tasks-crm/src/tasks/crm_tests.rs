use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use taskflow_protocols::{
    keys, ContactProperties, CrmClient, CrmContact, CrmNote, EventEmitter, IntegrationError,
    IntegrationKind, ProducerIndex, Task, TaskError, WorkflowContext,
};

use super::{AddNoteTask, CreateContactTask, UpdateContactTask, CONTACT_PROCESSED_EVENT};

#[derive(Default)]
struct State {
    contacts: Vec<CrmContact>,
    notes: Vec<CrmNote>,
}

#[derive(Default)]
struct MockCrm {
    state: Mutex<State>,
}

impl MockCrm {
    fn with_contact(email: &str) -> Self {
        let crm = Self::default();
        crm.state.lock().unwrap().contacts.push(CrmContact {
            id: "100".to_string(),
            email: email.to_string(),
            properties: ContactProperties::new(),
        });
        crm
    }

    fn contact(&self, id: &str) -> Option<CrmContact> {
        self.state.lock().unwrap().contacts.iter().find(|c| c.id == id).cloned()
    }
}

#[async_trait]
impl CrmClient for MockCrm {
    fn provider(&self) -> &str {
        "mock"
    }

    async fn find_contact_by_email(&self, email: &str) -> Result<Option<CrmContact>, IntegrationError> {
        let state = self.state.lock().unwrap();
        Ok(state.contacts.iter().find(|c| c.email == email).cloned())
    }

    async fn create_contact(
        &self,
        email: &str,
        properties: ContactProperties,
    ) -> Result<CrmContact, IntegrationError> {
        let mut state = self.state.lock().unwrap();
        let contact = CrmContact {
            id: (200 + state.contacts.len()).to_string(),
            email: email.to_string(),
            properties,
        };
        state.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(
        &self,
        contact_id: &str,
        properties: ContactProperties,
    ) -> Result<CrmContact, IntegrationError> {
        let mut state = self.state.lock().unwrap();
        let contact = state
            .contacts
            .iter_mut()
            .find(|c| c.id == contact_id)
            .ok_or_else(|| IntegrationError::NotFound(format!("contact {}", contact_id)))?;
        contact.properties.extend(properties);
        Ok(contact.clone())
    }

    async fn add_note(&self, contact_id: &str, body: &str) -> Result<CrmNote, IntegrationError> {
        let mut state = self.state.lock().unwrap();
        let note = CrmNote {
            id: format!("n{}", state.notes.len() + 1),
            contact_id: contact_id.to_string(),
            body: body.to_string(),
        };
        state.notes.push(note.clone());
        Ok(note)
    }
}

#[test]
fn test_all_require_crm_integration() {
    let tasks = crate::crm_tasks(Arc::new(MockCrm::default()));
    let types: Vec<&str> = tasks.iter().map(|t| t.task_type()).collect();
    assert_eq!(types, crate::TASK_TYPES);
    for task in &tasks {
        assert_eq!(task.display_info().integration_required, Some(IntegrationKind::Crm));
    }
}

#[test]
fn test_create_validate() {
    let task = CreateContactTask::new(Arc::new(MockCrm::default()));

    assert!(task
        .validate(&json!({"email": "jane@example.com", "firstName": "Jane"}))
        .is_valid());

    let missing = task.validate(&json!({"firstName": "Jane"}));
    assert!(!missing.is_valid());
    assert!(missing.errors().iter().any(|e| e.contains("email")));

    assert!(!task.validate(&json!({"email": "not-an-email"})).is_valid());
    assert!(!task
        .validate(&json!({"email": "jane@example.com", "upsert": "yes"}))
        .is_valid());
}

#[test]
fn test_create_validate_warnings() {
    let task = CreateContactTask::new(Arc::new(MockCrm::default()));

    let nameless = task.validate(&json!({"email": "jane@example.com"}));
    assert!(nameless.is_valid());
    assert_eq!(nameless.warnings().len(), 1);

    let overridden = task.validate(&json!({
        "email": "jane@example.com",
        "firstName": "Jane",
        "properties": {"firstname": "J"}
    }));
    assert!(overridden.is_valid());
    assert!(overridden.warnings().iter().any(|w| w.contains("firstname")));
}

#[tokio::test]
async fn test_create_new_contact_emits_event() {
    let crm = Arc::new(MockCrm::default());
    let task = CreateContactTask::new(crm.clone());
    let (emitter, mut rx) = EventEmitter::channel(8);
    let mut ctx = WorkflowContext::new("run-1").with_emitter(emitter);
    ctx.set_node_id("lead");

    let output = task
        .execute(
            json!({
                "email": "jane@example.com",
                "firstName": "Jane",
                "company": "Acme",
                "properties": {"lifecyclestage": "lead"}
            }),
            &mut ctx,
        )
        .await
        .unwrap();

    assert_eq!(output.data["created"], true);
    let contact = ctx.get::<CrmContact>(keys::HUBSPOT_CONTACT).unwrap();
    assert_eq!(contact.email, "jane@example.com");
    assert_eq!(contact.properties["firstname"], "Jane");
    assert_eq!(contact.properties["company"], "Acme");
    assert_eq!(contact.properties["lifecyclestage"], "lead");
    assert_eq!(ctx.written_by(keys::HUBSPOT_CONTACT), Some("lead"));

    let event = rx.try_recv().unwrap();
    assert_eq!(event.name, CONTACT_PROCESSED_EVENT);
    assert_eq!(event.payload["contactId"], contact.id.as_str());
    assert_eq!(event.payload["created"], true);
    assert_eq!(event.node_id.as_deref(), Some("lead"));
}

#[tokio::test]
async fn test_create_upserts_existing_contact() {
    let crm = Arc::new(MockCrm::with_contact("jane@example.com"));
    let task = CreateContactTask::new(crm.clone());
    let mut ctx = WorkflowContext::new("run-1");

    let output = task
        .execute(json!({"email": "jane@example.com", "lastName": "Doe"}), &mut ctx)
        .await
        .unwrap();

    assert_eq!(output.data["created"], false);
    assert_eq!(output.data["contact"]["id"], "100");
    assert_eq!(crm.contact("100").unwrap().properties["lastname"], "Doe");
}

#[tokio::test]
async fn test_create_without_upsert_always_creates() {
    let crm = Arc::new(MockCrm::with_contact("jane@example.com"));
    let task = CreateContactTask::new(crm.clone());
    let mut ctx = WorkflowContext::new("run-1");

    let output = task
        .execute(json!({"email": "jane@example.com", "upsert": false}), &mut ctx)
        .await
        .unwrap();

    assert_eq!(output.data["created"], true);
    assert_ne!(output.data["contact"]["id"], "100");
}

#[test]
fn test_update_validate() {
    let task = UpdateContactTask::new(Arc::new(MockCrm::default()));
    assert!(task.validate(&json!({"properties": {"a": 1}})).is_valid());
    assert!(!task.validate(&json!({})).is_valid());
    assert!(!task.validate(&json!({"properties": {}})).is_valid());
    assert!(!task
        .validate(&json!({"contactId": " ", "properties": {"a": 1}}))
        .is_valid());
}

#[test]
fn test_contact_reads_depend_on_explicit_id() {
    let task = AddNoteTask::new(Arc::new(MockCrm::default()));
    assert_eq!(task.context_reads(&json!({"body": "hi"})), vec![keys::HUBSPOT_CONTACT]);
    assert!(task
        .context_reads(&json!({"body": "hi", "contactId": "7"}))
        .is_empty());
}

#[tokio::test]
async fn test_update_uses_contact_from_context() {
    let crm = Arc::new(MockCrm::with_contact("jane@example.com"));
    let task = UpdateContactTask::new(crm.clone());
    let mut ctx = WorkflowContext::new("run-1");
    ctx.insert(keys::HUBSPOT_CONTACT, json!({"id": "100", "email": "jane@example.com"}));

    task.execute(json!({"properties": {"lifecyclestage": "customer"}}), &mut ctx)
        .await
        .unwrap();

    assert_eq!(crm.contact("100").unwrap().properties["lifecyclestage"], "customer");
    assert_eq!(
        ctx.get_value(keys::HUBSPOT_CONTACT).unwrap()["properties"]["lifecyclestage"],
        "customer"
    );
}

#[tokio::test]
async fn test_update_unknown_contact_is_integration_error() {
    let task = UpdateContactTask::new(Arc::new(MockCrm::default()));
    let mut ctx = WorkflowContext::new("run-1");

    let err = task
        .execute(json!({"contactId": "999", "properties": {"a": 1}}), &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Integration(IntegrationError::NotFound(_))));
}

#[tokio::test]
async fn test_add_note_without_contact_names_producer() {
    let task = AddNoteTask::new(Arc::new(MockCrm::default()));
    let mut producers = ProducerIndex::new();
    producers.insert(keys::HUBSPOT_CONTACT, "hubspot-create-contact");
    let mut ctx = WorkflowContext::new("run-1").with_producers(Arc::new(producers));

    let err = task
        .execute(json!({"body": "Requested a demo"}), &mut ctx)
        .await
        .unwrap_err();

    match err {
        TaskError::MissingContextKey { key, producer } => {
            assert_eq!(key, keys::HUBSPOT_CONTACT);
            assert!(producer.contains("hubspot-create-contact"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_add_note_with_numeric_context_id() {
    let crm = Arc::new(MockCrm::default());
    let task = AddNoteTask::new(crm.clone());
    let mut ctx = WorkflowContext::new("run-1");
    ctx.insert(keys::HUBSPOT_CONTACT, json!({"id": 51}));

    let output = task
        .execute(json!({"body": "Requested a demo"}), &mut ctx)
        .await
        .unwrap();

    assert_eq!(output.data["note"]["contactId"], "51");
    let note = ctx.get::<CrmNote>(keys::HUBSPOT_NOTE).unwrap();
    assert_eq!(note.body, "Requested a demo");
    assert_eq!(crm.state.lock().unwrap().notes.len(), 1);
}

#[test]
fn test_add_note_validate() {
    let task = AddNoteTask::new(Arc::new(MockCrm::default()));
    assert!(task.validate(&json!({"body": "hello"})).is_valid());
    assert!(!task.validate(&json!({})).is_valid());
    assert!(!task.validate(&json!({"body": "   "})).is_valid());
    assert!(!task.validate(&json!({"body": "x".repeat(70_000)})).is_valid());
}
