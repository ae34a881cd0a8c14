//! `http-get`: fetch a URL.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    keys, HttpClient, HttpRequest, IntegrationKind, Task, TaskCategory, TaskConfigSchema,
    TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput, ValidationResult, WorkflowContext,
};

use super::call::{
    apply_common, fail_on_status, fail_on_status_property, headers_property, perform,
    timeout_property, url_property, validate_common,
};

/// GET-only shorthand of `http-request`.
pub struct HttpGetTask {
    definition: TaskDefinition,
    client: Arc<dyn HttpClient>,
}

impl HttpGetTask {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        let schema = TaskConfigSchema::new("HTTP GET", "Fetch a URL and store the response body")
            .required_property("url", url_property())
            .property("headers", headers_property())
            .property("timeoutSeconds", timeout_property())
            .property("failOnStatus", fail_on_status_property())
            .example(json!({"url": "https://example.com"}));

        let display = TaskDisplayInfo::new(TaskCategory::Http, "HTTP GET", "download")
            .with_color("#10b981")
            .with_tags(["http", "fetch", "get"])
            .requires(IntegrationKind::Http);

        Self {
            definition: TaskDefinition::new("http-get", schema, display)
                .produces(keys::HTTP_RESPONSE)
                .produces(keys::HTTP_STATUS),
            client,
        }
    }
}

#[async_trait]
impl Task for HttpGetTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_common(input, &mut result);
        result
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let url = str_field(&input, "url")
            .ok_or_else(|| TaskError::InvalidInput("url is required".to_string()))?;
        let request = apply_common(HttpRequest::get(url), &input)?;
        perform(&self.client, request, fail_on_status(&input), ctx).await
    }
}

#[cfg(test)]
#[path = "http_get_tests.rs"]
mod tests;
