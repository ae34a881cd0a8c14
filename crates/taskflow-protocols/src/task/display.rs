//! Presentation metadata for tasks.

use serde::{Deserialize, Serialize};

use crate::integration::IntegrationKind;

/// Category tag used to group tasks in the dashboard palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Core,
    Data,
    Http,
    Storage,
    Crm,
}

/// UI-facing metadata. Carries no behavior except `integration_required`,
/// which the registry consults when deciding what to register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDisplayInfo {
    pub category: TaskCategory,
    pub label: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integration_required: Option<IntegrationKind>,
}

impl TaskDisplayInfo {
    pub fn new(category: TaskCategory, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            category,
            label: label.into(),
            icon: icon.into(),
            color: None,
            tags: Vec::new(),
            integration_required: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn requires(mut self, integration: IntegrationKind) -> Self {
        self.integration_required = Some(integration);
        self
    }
}
