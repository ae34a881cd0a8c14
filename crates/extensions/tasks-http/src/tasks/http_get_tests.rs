use super::*;
use std::sync::Mutex;
use std::time::Duration;
use taskflow_protocols::{HttpResponse, IntegrationError};

/// Client returning a canned response and recording requests.
struct MockHttpClient {
    response: HttpResponse,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpClient {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            response: HttpResponse::new(status, body),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    fn id(&self) -> &str {
        "mock"
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, IntegrationError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

/// Client that never answers.
struct HangingClient;

#[async_trait]
impl HttpClient for HangingClient {
    fn id(&self) -> &str {
        "hanging"
    }

    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, IntegrationError> {
        std::future::pending().await
    }
}

#[test]
fn test_definition() {
    let task = HttpGetTask::new(MockHttpClient::new(200, json!(null)));
    assert_eq!(task.task_type(), "http-get");
    assert_eq!(task.display_info().integration_required, Some(IntegrationKind::Http));
    assert_eq!(task.definition().produces, vec![keys::HTTP_RESPONSE, keys::HTTP_STATUS]);
}

#[test]
fn test_validate_missing_url() {
    let task = HttpGetTask::new(MockHttpClient::new(200, json!(null)));
    let result = task.validate(&json!({}));
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.contains("url")));
}

#[test]
fn test_validate_valid_url() {
    let task = HttpGetTask::new(MockHttpClient::new(200, json!(null)));
    let result = task.validate(&json!({"url": "https://example.com"}));
    assert!(result.is_valid());
    assert!(result.errors().is_empty());
}

#[test]
fn test_validate_is_deterministic() {
    let task = HttpGetTask::new(MockHttpClient::new(200, json!(null)));
    let input = json!({"url": "nope", "timeoutSeconds": 0, "extra": true});
    assert_eq!(task.validate(&input), task.validate(&input));
}

#[tokio::test]
async fn test_execute_writes_response_to_context() {
    let client = MockHttpClient::new(200, json!({"customer": {"id": 9}}));
    let task = HttpGetTask::new(client.clone());
    let mut ctx = WorkflowContext::new("run-1");
    ctx.set_node_id("fetch");

    let output = task
        .execute(json!({"url": "https://example.com/customers/9"}), &mut ctx)
        .await
        .unwrap();

    assert!(output.success);
    assert_eq!(output.data["status"], 200);
    assert_eq!(
        ctx.get_value(keys::HTTP_RESPONSE),
        Some(&json!({"customer": {"id": 9}}))
    );
    assert_eq!(ctx.get::<u16>(keys::HTTP_STATUS), Some(200));
    assert_eq!(ctx.written_by(keys::HTTP_RESPONSE), Some("fetch"));

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "https://example.com/customers/9");
    assert_eq!(requests[0].timeout, Duration::from_secs(30));
}

#[tokio::test]
async fn test_execute_error_status_fails() {
    let task = HttpGetTask::new(MockHttpClient::new(503, json!("unavailable")));
    let mut ctx = WorkflowContext::new("run-1");

    let err = task
        .execute(json!({"url": "https://example.com"}), &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskError::Integration(IntegrationError::Status { status: 503, .. })
    ));
    assert!(!ctx.contains(keys::HTTP_RESPONSE));
}

#[tokio::test]
async fn test_execute_error_status_tolerated() {
    let task = HttpGetTask::new(MockHttpClient::new(404, json!({"error": "missing"})));
    let mut ctx = WorkflowContext::new("run-1");

    task.execute(json!({"url": "https://example.com", "failOnStatus": false}), &mut ctx)
        .await
        .unwrap();

    assert_eq!(ctx.get::<u16>(keys::HTTP_STATUS), Some(404));
}

#[tokio::test(start_paused = true)]
async fn test_execute_times_out() {
    let task = HttpGetTask::new(Arc::new(HangingClient));
    let mut ctx = WorkflowContext::new("run-1");

    let err = task
        .execute(json!({"url": "https://example.com", "timeoutSeconds": 2}), &mut ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, TaskError::Timeout(d) if d == Duration::from_secs(2)));
}
