use super::*;
use async_trait::async_trait;
use serde_json::{json, Value};
use taskflow_protocols::{
    IntegrationKind, KeyValueStore, IntegrationError, TaskCategory, TaskConfigSchema,
    TaskDisplayInfo, TaskError, TaskOutput, WorkflowContext,
};
use std::time::Duration;

struct MockTask {
    definition: TaskDefinition,
}

impl MockTask {
    fn new(task_type: &str) -> Self {
        Self {
            definition: TaskDefinition::new(
                task_type,
                TaskConfigSchema::new("Mock", "A mock task"),
                TaskDisplayInfo::new(TaskCategory::Core, "Mock", "box"),
            ),
        }
    }

    fn with_label(task_type: &str, label: &str) -> Self {
        let mut task = Self::new(task_type);
        task.definition.display.label = label.to_string();
        task
    }

    fn requiring(task_type: &str, kind: IntegrationKind) -> Self {
        let mut task = Self::new(task_type);
        task.definition.display = task.definition.display.requires(kind);
        task
    }

    fn producing(task_type: &str, key: &str) -> Self {
        let mut task = Self::new(task_type);
        task.definition = task.definition.produces(key);
        task
    }
}

#[async_trait]
impl Task for MockTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        _input: Value,
        _ctx: &mut WorkflowContext,
    ) -> Result<TaskOutput, TaskError> {
        Ok(TaskOutput::success(json!(null)))
    }
}

struct NullStore;

#[async_trait]
impl KeyValueStore for NullStore {
    fn id(&self) -> &str {
        "null"
    }

    async fn get(&self, _key: &str) -> Result<Option<Value>, IntegrationError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: Value,
        _ttl: Option<Duration>,
    ) -> Result<(), IntegrationError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool, IntegrationError> {
        Ok(false)
    }
}

#[test]
fn test_registry_creation() {
    let registry = TaskRegistry::new();
    assert_eq!(registry.task_count(), 0);
    assert!(registry.definitions().is_empty());
}

#[test]
fn test_register_task() {
    let registry = TaskRegistry::default();
    assert!(registry.register_task(Arc::new(MockTask::new("delay"))).is_none());
    assert_eq!(registry.task_count(), 1);
    assert!(registry.contains("delay"));
}

#[test]
fn test_last_registration_wins() {
    let registry = TaskRegistry::new();
    registry.register_task(Arc::new(MockTask::with_label("delay", "first")));
    let previous = registry.register_task(Arc::new(MockTask::with_label("delay", "second")));

    assert_eq!(previous.unwrap().display_info().label, "first");
    assert_eq!(registry.task_count(), 1);
    assert_eq!(registry.get("delay").unwrap().display_info().label, "second");
}

#[test]
fn test_register_available_skips_missing_integration() {
    let registry = TaskRegistry::new();
    let integrations = Integrations::new();

    let registered = registry.register_available(
        Arc::new(MockTask::requiring("kv-get", IntegrationKind::Kv)),
        &integrations,
    );
    assert!(!registered);
    assert_eq!(registry.task_count(), 0);
    assert!(registry.get("kv-get").is_none());
}

#[test]
fn test_register_available_with_integration() {
    let registry = TaskRegistry::new();
    let integrations = Integrations::new().with_kv(Arc::new(NullStore));

    let registered = registry.register_available(
        Arc::new(MockTask::requiring("kv-get", IntegrationKind::Kv)),
        &integrations,
    );
    assert!(registered);
    assert!(registry.contains("kv-get"));
}

#[test]
fn test_register_all_counts_registered() {
    let registry = TaskRegistry::new();
    let tasks: Vec<Arc<dyn Task>> = vec![
        Arc::new(MockTask::new("delay")),
        Arc::new(MockTask::requiring("hubspot-add-note", IntegrationKind::Crm)),
        Arc::new(MockTask::requiring("kv-set", IntegrationKind::Kv)),
    ];
    let integrations = Integrations::new().with_kv(Arc::new(NullStore));

    assert_eq!(registry.register_all(tasks, &integrations), 2);
    assert_eq!(registry.task_types(), vec!["delay", "kv-set"]);
}

#[test]
fn test_resolve_miss_is_configuration_error() {
    let registry = TaskRegistry::new();
    let err = registry.resolve("step-2", "hubspot-create-contact").err().unwrap();
    match err {
        WorkflowError::Configuration { node_id, task_type } => {
            assert_eq!(node_id, "step-2");
            assert_eq!(task_type, "hubspot-create-contact");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_resolve_hit() {
    let registry = TaskRegistry::new();
    registry.register_task(Arc::new(MockTask::new("delay")));
    let task = registry.resolve("wait", "delay").unwrap();
    assert_eq!(task.task_type(), "delay");
}

#[test]
fn test_definitions_sorted() {
    let registry = TaskRegistry::new();
    registry.register_task(Arc::new(MockTask::new("transform")));
    registry.register_task(Arc::new(MockTask::new("delay")));
    let types: Vec<String> = registry
        .definitions()
        .into_iter()
        .map(|d| d.task_type)
        .collect();
    assert_eq!(types, vec!["delay", "transform"]);
}

#[test]
fn test_producer_index() {
    let registry = TaskRegistry::new();
    registry.register_task(Arc::new(MockTask::producing("http-request", "httpResponse")));
    registry.register_task(Arc::new(MockTask::new("delay")));

    let index = registry.producer_index();
    assert_eq!(index.producers_of("httpResponse"), ["http-request".to_string()]);
    assert!(index.producers_of("delay").is_empty());
}

#[tokio::test]
async fn test_registry_shared_across_tasks() {
    let registry = Arc::new(TaskRegistry::new());
    registry.register_task(Arc::new(MockTask::new("delay")));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let registry = registry.clone();
        handles.push(tokio::spawn(async move { registry.get("delay").is_some() }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }
}
