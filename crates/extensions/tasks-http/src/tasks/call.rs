//! Configuration handling and execution shared by the HTTP tasks.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::HeaderName;
use serde_json::{json, Value};
use tracing::debug;

use taskflow_protocols::task::{is_http_url, str_field};
use taskflow_protocols::{
    keys, HttpAuth, HttpClient, HttpRequest, IntegrationError, PropertySchema, TaskError,
    TaskOutput, ValidationResult, WorkflowContext,
};

pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub(crate) const MAX_TIMEOUT_SECS: u64 = 300;
const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";

pub(crate) fn url_property() -> PropertySchema {
    PropertySchema::string()
        .title("URL")
        .description("Absolute http(s) URL")
        .format("uri")
        .example("https://api.example.com/v1/items")
}

pub(crate) fn headers_property() -> PropertySchema {
    PropertySchema::object()
        .title("Headers")
        .description("Request headers, name to string value")
        .example(json!({"Accept": "application/json"}))
}

pub(crate) fn timeout_property() -> PropertySchema {
    PropertySchema::integer()
        .title("Timeout (seconds)")
        .description("Abort the request after this many seconds")
        .minimum(0.0)
        .default_value(DEFAULT_TIMEOUT_SECS)
}

pub(crate) fn fail_on_status_property() -> PropertySchema {
    PropertySchema::boolean()
        .title("Fail on error status")
        .description("Treat non-2xx responses as a failed step")
        .default_value(true)
}

/// Checks for `url`, `headers` and `timeoutSeconds`.
pub(crate) fn validate_common(input: &Value, result: &mut ValidationResult) {
    if let Some(url) = str_field(input, "url") {
        if !is_http_url(url) {
            result.add_error(format!("url: '{}' is not a valid http(s) URL", url));
        }
    }

    if let Some(headers) = input.get("headers").and_then(Value::as_object) {
        for (name, value) in headers {
            if HeaderName::from_bytes(name.as_bytes()).is_err() {
                result.add_error(format!("headers: '{}' is not a valid header name", name));
            }
            if !value.is_string() {
                result.add_error(format!("headers.{}: value must be a string", name));
            }
        }
    }

    if let Some(timeout) = input.get("timeoutSeconds").and_then(Value::as_u64) {
        if timeout == 0 {
            result.add_error("timeoutSeconds: must be at least 1");
        } else if timeout > MAX_TIMEOUT_SECS {
            result.add_warning(format!(
                "timeoutSeconds: {} is above {}, steps may hold the pipeline for a long time",
                timeout, MAX_TIMEOUT_SECS
            ));
        }
    }
}

/// Checks the `auth` object.
pub(crate) fn validate_auth(input: &Value, result: &mut ValidationResult) {
    let Some(auth) = input.get("auth").and_then(Value::as_object) else {
        return;
    };
    let has = |field: &str| {
        auth.get(field)
            .and_then(Value::as_str)
            .is_some_and(|v| !v.is_empty())
    };

    match auth.get("type").and_then(Value::as_str).unwrap_or("none") {
        "none" => {
            if has("username") || has("password") || has("token") || has("key") {
                result.add_warning("auth: credentials are ignored when type is 'none'");
            }
        }
        "basic" => {
            if !has("username") || !has("password") {
                result.add_error("auth: basic authentication requires both username and password");
            }
        }
        "bearer" => {
            if !has("token") {
                result.add_error("auth: bearer authentication requires a token");
            }
        }
        "apiKey" => {
            if !has("key") {
                result.add_error("auth: apiKey authentication requires a key");
            }
        }
        other => result.add_error(format!(
            "auth: unknown type '{}', expected one of none, basic, bearer, apiKey",
            other
        )),
    }

    let sets_authorization = input
        .get("headers")
        .and_then(Value::as_object)
        .is_some_and(|h| h.keys().any(|k| k.eq_ignore_ascii_case("authorization")));
    if sets_authorization && matches!(auth.get("type").and_then(Value::as_str), Some("basic" | "bearer")) {
        result.add_warning("headers: Authorization header is overridden by auth");
    }
}

/// Fill url, headers and timeout of `request` from a validated config.
pub(crate) fn apply_common(mut request: HttpRequest, input: &Value) -> Result<HttpRequest, TaskError> {
    if !is_http_url(&request.url) {
        return Err(TaskError::InvalidInput(format!("invalid url '{}'", request.url)));
    }

    if let Some(headers) = input.get("headers").and_then(Value::as_object) {
        for (name, value) in headers {
            let value = value.as_str().ok_or_else(|| {
                TaskError::InvalidInput(format!("header '{}' must be a string", name))
            })?;
            request.headers.insert(name.clone(), value.to_string());
        }
    }

    let timeout = input
        .get("timeoutSeconds")
        .and_then(Value::as_u64)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .max(1);
    request.timeout = Duration::from_secs(timeout);

    Ok(request)
}

/// Apply the `auth` object to `request`.
pub(crate) fn apply_auth(mut request: HttpRequest, input: &Value) -> Result<HttpRequest, TaskError> {
    let Some(auth) = input.get("auth") else {
        return Ok(request);
    };
    let field = |name: &str| auth.get(name).and_then(Value::as_str).map(str::to_string);
    let missing = |what: &str| TaskError::InvalidInput(format!("auth: missing {}", what));

    match str_field(auth, "type").unwrap_or("none") {
        "none" => {}
        "basic" => {
            request.auth = Some(HttpAuth::Basic {
                username: field("username").ok_or_else(|| missing("username"))?,
                password: field("password").ok_or_else(|| missing("password"))?,
            });
        }
        "bearer" => {
            request.auth = Some(HttpAuth::Bearer(field("token").ok_or_else(|| missing("token"))?));
        }
        "apiKey" => {
            let header = field("headerName").unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
            request.headers.insert(header, field("key").ok_or_else(|| missing("key"))?);
        }
        other => {
            return Err(TaskError::InvalidInput(format!("auth: unknown type '{}'", other)));
        }
    }

    Ok(request)
}

pub(crate) fn fail_on_status(input: &Value) -> bool {
    input
        .get("failOnStatus")
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

/// Send the request and publish the response into the context.
pub(crate) async fn perform(
    client: &Arc<dyn HttpClient>,
    request: HttpRequest,
    fail_on_status: bool,
    ctx: &mut WorkflowContext,
) -> Result<TaskOutput, TaskError> {
    let timeout = request.timeout;
    let method = request.method;
    let url = request.url.clone();
    let started = Instant::now();

    let response = tokio::time::timeout(timeout, client.send(request))
        .await
        .map_err(|_| TaskError::Timeout(timeout))??;

    let elapsed = started.elapsed();
    debug!(
        method = %method,
        url = %url,
        status = response.status,
        elapsed_ms = elapsed.as_millis() as u64,
        "HTTP response received"
    );

    if fail_on_status && !response.is_success() {
        return Err(IntegrationError::Status {
            status: response.status,
            body: body_excerpt(&response.body),
        }
        .into());
    }

    ctx.insert(keys::HTTP_RESPONSE, response.body.clone());
    ctx.insert(keys::HTTP_STATUS, json!(response.status));

    let headers: BTreeMap<String, String> = response.headers;
    Ok(TaskOutput::success(json!({
        "status": response.status,
        "headers": headers,
        "body": response.body,
    }))
    .with_message(format!("{} {} -> {}", method, url, response.status))
    .with_metadata("durationMs", json!(elapsed.as_millis() as u64)))
}

fn body_excerpt(body: &Value) -> String {
    let text = match body {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    };
    if text.chars().count() > 200 {
        let cut: String = text.chars().take(200).collect();
        format!("{}...", cut)
    } else {
        text
    }
}
