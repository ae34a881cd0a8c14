//! `http-request`: call an HTTP endpoint with any supported method.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use taskflow_protocols::task::{str_field, validate_against_schema};
use taskflow_protocols::{
    keys, HttpClient, HttpMethod, HttpRequest, IntegrationKind, PropertySchema, Task,
    TaskCategory, TaskConfigSchema, TaskDefinition, TaskDisplayInfo, TaskError, TaskOutput,
    ValidationResult, WorkflowContext,
};

use super::call::{
    apply_auth, apply_common, fail_on_status, fail_on_status_property, headers_property, perform,
    timeout_property, url_property, validate_auth, validate_common,
};

/// General-purpose HTTP call. Writes `httpResponse` and `httpStatus`.
pub struct HttpRequestTask {
    definition: TaskDefinition,
    client: Arc<dyn HttpClient>,
}

impl HttpRequestTask {
    pub fn new(client: Arc<dyn HttpClient>) -> Self {
        let schema = TaskConfigSchema::new(
            "HTTP Request",
            "Send an HTTP request and store the response body in the workflow context",
        )
        .required_property("url", url_property())
        .property(
            "method",
            PropertySchema::string()
                .title("Method")
                .one_of(HttpMethod::ALL)
                .default_value("GET"),
        )
        .property("headers", headers_property())
        .property(
            "body",
            PropertySchema::any()
                .title("Body")
                .description("JSON body for POST, PUT and PATCH"),
        )
        .property(
            "bodyFrom",
            PropertySchema::string()
                .title("Body from context")
                .description("Context key whose value is sent as the JSON body")
                .example(keys::HUBSPOT_CONTACT),
        )
        .property(
            "auth",
            PropertySchema::object()
                .title("Authentication")
                .description(
                    "{type: none|basic|bearer|apiKey, username, password, token, key, headerName}",
                )
                .example(json!({"type": "bearer", "token": "${API_TOKEN}"})),
        )
        .property("timeoutSeconds", timeout_property())
        .property("failOnStatus", fail_on_status_property())
        .example(json!({
            "url": "https://api.example.com/v1/orders",
            "method": "POST",
            "body": {"sku": "A-1", "quantity": 2},
            "auth": {"type": "bearer", "token": "secret"}
        }));

        let display = TaskDisplayInfo::new(TaskCategory::Http, "HTTP Request", "globe")
            .with_color("#10b981")
            .with_tags(["http", "api", "rest", "webhook"])
            .requires(IntegrationKind::Http);

        Self {
            definition: TaskDefinition::new("http-request", schema, display)
                .produces(keys::HTTP_RESPONSE)
                .produces(keys::HTTP_STATUS),
            client,
        }
    }
}

fn method_of(input: &Value) -> Result<HttpMethod, TaskError> {
    str_field(input, "method")
        .unwrap_or("GET")
        .parse()
        .map_err(TaskError::InvalidInput)
}

#[async_trait]
impl Task for HttpRequestTask {
    fn definition(&self) -> &TaskDefinition {
        &self.definition
    }

    fn validate(&self, input: &Value) -> ValidationResult {
        let mut result = validate_against_schema(self.schema(), input);
        validate_common(input, &mut result);
        validate_auth(input, &mut result);

        let has_body = input.get("body").is_some();
        let has_body_from = input.get("bodyFrom").is_some();
        if has_body && has_body_from {
            result.add_error("body and bodyFrom are mutually exclusive");
        }

        if let Ok(method) = method_of(input) {
            if (has_body || has_body_from) && !method.allows_body() {
                result.add_warning(format!("body: ignored for {} requests", method));
            }
        }

        result
    }

    fn context_reads(&self, input: &Value) -> Vec<String> {
        str_field(input, "bodyFrom")
            .map(|k| vec![k.to_string()])
            .unwrap_or_default()
    }

    async fn execute(&self, input: Value, ctx: &mut WorkflowContext) -> Result<TaskOutput, TaskError> {
        let url = str_field(&input, "url")
            .ok_or_else(|| TaskError::InvalidInput("url is required".to_string()))?;
        let method = method_of(&input)?;

        let mut request = apply_common(HttpRequest::new(method, url), &input)?;
        request = apply_auth(request, &input)?;

        if method.allows_body() {
            request.body = match str_field(&input, "bodyFrom") {
                Some(key) => Some(ctx.require(key)?.clone()),
                None => input.get("body").cloned(),
            };
        }

        perform(&self.client, request, fail_on_status(&input), ctx).await
    }
}

#[cfg(test)]
#[path = "http_request_tests.rs"]
mod tests;
