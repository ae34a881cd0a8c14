//! Task registry.

use std::sync::Arc;

use taskflow_protocols::{
    Integrations, ProducerIndex, Task, TaskDefinition, WorkflowError,
};
use tracing::{debug, info, warn};

use super::base::{BaseRegistry, Registerable};

impl Registerable for dyn Task {
    fn registry_id(&self) -> &str {
        self.task_type()
    }
}

/// Registry mapping task types to task instances.
///
/// Populated once at startup, then shared read-only across runs.
pub struct TaskRegistry {
    inner: BaseRegistry<dyn Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            inner: BaseRegistry::new(),
        }
    }

    /// Register a task. Re-registering a type replaces the previous entry.
    pub fn register_task(&self, task: Arc<dyn Task>) -> Option<Arc<dyn Task>> {
        let task_type = task.task_type().to_string();
        let previous = self.inner.upsert(task);
        if previous.is_some() {
            warn!(task_type = %task_type, "Task type registered twice, replacing previous entry");
        } else {
            debug!(task_type = %task_type, "Registered task");
        }
        previous
    }

    /// Register a task only if the integration it declares is present.
    ///
    /// Returns whether the task was registered.
    pub fn register_available(&self, task: Arc<dyn Task>, integrations: &Integrations) -> bool {
        if let Some(kind) = task.display_info().integration_required {
            if !integrations.is_available(kind) {
                info!(
                    task_type = %task.task_type(),
                    integration = %kind,
                    "Skipping task, integration not configured"
                );
                return false;
            }
        }
        self.register_task(task);
        true
    }

    /// Register every task in `tasks` that passes [`Self::register_available`].
    pub fn register_all<I>(&self, tasks: I, integrations: &Integrations) -> usize
    where
        I: IntoIterator<Item = Arc<dyn Task>>,
    {
        tasks
            .into_iter()
            .filter(|task| self.register_available(task.clone(), integrations))
            .count()
    }

    pub fn get(&self, task_type: &str) -> Option<Arc<dyn Task>> {
        self.inner.get(task_type)
    }

    pub fn contains(&self, task_type: &str) -> bool {
        self.inner.contains(task_type)
    }

    /// Look up the task for a workflow node.
    ///
    /// A miss means the capability is not deployed here, which is a
    /// configuration problem for the workflow author.
    pub fn resolve(&self, node_id: &str, task_type: &str) -> Result<Arc<dyn Task>, WorkflowError> {
        self.get(task_type).ok_or_else(|| WorkflowError::Configuration {
            node_id: node_id.to_string(),
            task_type: task_type.to_string(),
        })
    }

    /// Number of distinct registered task types.
    pub fn task_count(&self) -> usize {
        self.inner.len()
    }

    /// Registered task types, sorted.
    pub fn task_types(&self) -> Vec<String> {
        self.inner.list_ids()
    }

    /// All task definitions, sorted by type.
    pub fn definitions(&self) -> Vec<TaskDefinition> {
        let mut definitions: Vec<TaskDefinition> =
            self.inner.iter().map(|t| t.definition().clone()).collect();
        definitions.sort_by(|a, b| a.task_type.cmp(&b.task_type));
        definitions
    }

    /// Which registered task types produce which context keys.
    pub fn producer_index(&self) -> ProducerIndex {
        let mut index = ProducerIndex::new();
        for task in self.inner.iter() {
            for key in &task.definition().produces {
                index.insert(key.clone(), task.task_type());
            }
        }
        index
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskRegistry")
            .field("task_types", &self.task_types())
            .finish()
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
