//! Registry construction.

use std::sync::Arc;

use tracing::info;

use taskflow_core::TaskRegistry;
use taskflow_protocols::{Integrations, Task};

/// Every task this deployment can offer, given the integrations at hand.
///
/// Core tasks are always included; each integration pack contributes its
/// tasks only when its client is present.
pub fn available_tasks(integrations: &Integrations) -> Vec<Arc<dyn Task>> {
    taskflow_tasks_transform::core_tasks()
        .into_iter()
        .chain(integrations.http.clone().into_iter().flat_map(taskflow_tasks_http::http_tasks))
        .chain(integrations.kv.clone().into_iter().flat_map(taskflow_tasks_kv::kv_tasks))
        .chain(integrations.crm.clone().into_iter().flat_map(taskflow_tasks_crm::crm_tasks))
        .collect()
}

/// Build a registry over `integrations`.
pub fn build_registry(integrations: &Integrations) -> TaskRegistry {
    let registry = TaskRegistry::new();
    let registered = registry.register_all(available_tasks(integrations), integrations);
    info!(
        tasks = registered,
        integrations = ?integrations.available(),
        "Task registry built"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_only() {
        let registry = build_registry(&Integrations::new());
        assert_eq!(registry.task_count(), taskflow_tasks_transform::TASK_TYPES.len());
        for task_type in taskflow_tasks_transform::TASK_TYPES {
            assert!(registry.contains(task_type));
        }
        for task_type in taskflow_tasks_http::TASK_TYPES {
            assert!(!registry.contains(task_type));
        }
    }

    #[test]
    fn test_kv_pack_follows_store() {
        let integrations =
            Integrations::new().with_kv(Arc::new(taskflow_tasks_kv::InMemoryKvStore::new()));
        let registry = build_registry(&integrations);
        assert_eq!(
            registry.task_count(),
            taskflow_tasks_transform::TASK_TYPES.len() + taskflow_tasks_kv::TASK_TYPES.len()
        );
        assert!(registry.contains("kv-get"));
        assert!(!registry.contains("hubspot-add-note"));
    }
}
