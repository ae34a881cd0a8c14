use super::*;
use serde_json::json;

#[test]
fn test_context_new() {
    let ctx = WorkflowContext::new("run-1");
    assert_eq!(ctx.run_id(), "run-1");
    assert_eq!(ctx.node_id(), "");
    assert!(ctx.data().is_empty());
    assert!(!ctx.is_cancelled());
}

#[test]
fn test_set_node_id() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.set_node_id("fetch");
    assert_eq!(ctx.node_id(), "fetch");
}

#[test]
fn test_get_set() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.set("key", "value").unwrap();
    let result: Option<String> = ctx.get("key");
    assert_eq!(result, Some("value".to_string()));
}

#[test]
fn test_get_missing() {
    let ctx = WorkflowContext::new("run-1");
    let result: Option<String> = ctx.get("missing");
    assert!(result.is_none());
}

#[test]
fn test_get_wrong_type() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.insert("count", json!("not a number"));
    let result: Option<i32> = ctx.get("count");
    assert!(result.is_none());
}

#[test]
fn test_set_complex_value() {
    let mut ctx = WorkflowContext::new("run-1");
    let data = json!({"nested": {"key": "value"}});
    ctx.set("complex", data.clone()).unwrap();
    assert_eq!(ctx.get_value("complex"), Some(&data));
}

#[test]
fn test_provenance_tracks_writer() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.set_node_id("fetch");
    ctx.insert(keys::HTTP_RESPONSE, json!({"ok": true}));
    ctx.set_node_id("store");
    ctx.insert("other", json!(1));

    assert_eq!(ctx.written_by(keys::HTTP_RESPONSE), Some("fetch"));
    assert_eq!(ctx.written_by("other"), Some("store"));
}

#[test]
fn test_seeded_data_has_no_writer() {
    let mut seed = HashMap::new();
    seed.insert("input".to_string(), json!(5));
    let ctx = WorkflowContext::new("run-1").with_data(seed);
    assert!(ctx.contains("input"));
    assert!(ctx.written_by("input").is_none());
}

#[test]
fn test_require_present() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.insert("k", json!(1));
    assert_eq!(ctx.require("k").unwrap(), &json!(1));
}

#[test]
fn test_require_missing_names_producer() {
    let mut index = ProducerIndex::new();
    index.insert(keys::HTTP_RESPONSE, "http-request");
    let ctx = WorkflowContext::new("run-1").with_producers(Arc::new(index));

    let err = ctx.require(keys::HTTP_RESPONSE).unwrap_err();
    match err {
        TaskError::MissingContextKey { key, producer } => {
            assert_eq!(key, "httpResponse");
            assert_eq!(producer, "task type 'http-request'");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_require_missing_unknown_producer() {
    let ctx = WorkflowContext::new("run-1");
    let err = ctx.require("custom").unwrap_err();
    assert!(err.to_string().contains("an upstream task"));
}

#[test]
fn test_producer_index_multiple() {
    let mut index = ProducerIndex::new();
    index.insert("httpResponse", "http-request");
    index.insert("httpResponse", "http-get");
    index.insert("httpResponse", "http-get");
    assert_eq!(index.producers_of("httpResponse").len(), 2);
    assert_eq!(
        index.describe("httpResponse"),
        "one of task types 'http-get', 'http-request'"
    );
    assert_eq!(index.len(), 1);
    assert!(!index.is_empty());
}

#[test]
fn test_remove() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.set_node_id("a");
    ctx.insert("k", json!(1));
    assert_eq!(ctx.remove("k"), Some(json!(1)));
    assert!(!ctx.contains("k"));
    assert!(ctx.written_by("k").is_none());
}

#[tokio::test]
async fn test_emit_attributes_current_node() {
    let (emitter, mut rx) = EventEmitter::channel(4);
    let mut ctx = WorkflowContext::new("run-9").with_emitter(emitter);
    ctx.set_node_id("crm");

    assert!(ctx.emit("hubspot.contact.processed", json!({"id": "1"})));

    let event = rx.recv().await.unwrap();
    assert_eq!(event.name, "hubspot.contact.processed");
    assert_eq!(event.run_id, "run-9");
    assert_eq!(event.node_id.as_deref(), Some("crm"));
    assert_eq!(event.payload["id"], "1");
}

#[test]
fn test_emit_without_sink_is_noop() {
    let ctx = WorkflowContext::new("run-1");
    assert!(!ctx.emit("anything", json!(null)));
}

#[test]
fn test_cancellation_shared_with_caller() {
    let token = CancellationToken::new();
    let ctx = WorkflowContext::new("run-1").with_cancellation(token.clone());
    assert!(!ctx.is_cancelled());
    token.cancel();
    assert!(ctx.is_cancelled());
}

#[test]
fn test_contexts_are_isolated() {
    let mut a = WorkflowContext::new("run-a");
    let b = WorkflowContext::new("run-b");
    a.insert("k", json!(1));
    assert!(!b.contains("k"));
}

#[test]
fn test_into_data() {
    let mut ctx = WorkflowContext::new("run-1");
    ctx.insert("k", json!("v"));
    let data = ctx.into_data();
    assert_eq!(data.get("k"), Some(&json!("v")));
}
