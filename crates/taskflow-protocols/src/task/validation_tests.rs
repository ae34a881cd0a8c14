use super::*;
use crate::task::PropertySchema;
use serde_json::json;

fn schema() -> TaskConfigSchema {
    TaskConfigSchema::new("Test", "Test schema")
        .required_property("url", PropertySchema::string().format("uri"))
        .required_property("key", PropertySchema::string())
        .property("method", PropertySchema::string().one_of(["GET", "POST"]))
        .property("timeoutSeconds", PropertySchema::integer().range(1.0, 300.0))
}

#[test]
fn test_new_result_is_valid() {
    let result = ValidationResult::new();
    assert!(result.is_valid());
    assert!(result.errors().is_empty());
    assert!(result.warnings().is_empty());
}

#[test]
fn test_warning_does_not_invalidate() {
    let mut result = ValidationResult::new();
    result.add_warning("slow");
    assert!(result.is_valid());
    assert_eq!(result.warnings(), &["slow".to_string()]);
}

#[test]
fn test_error_invalidates() {
    let mut result = ValidationResult::default();
    result.add_error("bad");
    assert!(!result.is_valid());
}

#[test]
fn test_merge() {
    let mut a = ValidationResult::new();
    a.add_warning("w1");
    let mut b = ValidationResult::new();
    b.add_error("e1");
    b.add_warning("w2");
    a.merge(b);
    assert!(!a.is_valid());
    assert_eq!(a.errors().len(), 1);
    assert_eq!(a.warnings().len(), 2);
}

#[test]
fn test_serializes_is_valid() {
    let mut result = ValidationResult::new();
    result.add_error("missing url");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["isValid"], false);
    assert_eq!(json["errors"][0], "missing url");
    assert_eq!(json["warnings"], json!([]));
}

#[test]
fn test_missing_required_fields_all_reported() {
    let result = validate_against_schema(&schema(), &json!({}));
    assert!(!result.is_valid());
    assert!(result.errors().iter().any(|e| e.contains("url")));
    assert!(result.errors().iter().any(|e| e.contains("key")));
}

#[test]
fn test_valid_input() {
    let result = validate_against_schema(
        &schema(),
        &json!({"url": "https://example.com", "key": "k", "method": "POST"}),
    );
    assert!(result.is_valid(), "{:?}", result);
}

#[test]
fn test_wrong_type_is_error() {
    let result = validate_against_schema(&schema(), &json!({"url": 42, "key": "k"}));
    assert!(!result.is_valid());
    assert!(result.errors()[0].starts_with("url"));
}

#[test]
fn test_enum_violation_is_error() {
    let result = validate_against_schema(
        &schema(),
        &json!({"url": "https://example.com", "key": "k", "method": "TRACE"}),
    );
    assert!(!result.is_valid());
    assert!(result.errors()[0].contains("method"));
}

#[test]
fn test_range_violation_is_error() {
    let result = validate_against_schema(
        &schema(),
        &json!({"url": "https://example.com", "key": "k", "timeoutSeconds": 0}),
    );
    assert!(!result.is_valid());
}

#[test]
fn test_format_is_not_enforced_by_engine() {
    let result = validate_against_schema(&schema(), &json!({"url": "not a url", "key": "k"}));
    assert!(result.is_valid());
}

#[test]
fn test_unknown_property_is_warning() {
    let result = validate_against_schema(
        &schema(),
        &json!({"url": "https://example.com", "key": "k", "extra": true}),
    );
    assert!(result.is_valid());
    assert!(result.warnings()[0].contains("extra"));
}

#[test]
fn test_non_object_input() {
    let result = validate_against_schema(&schema(), &json!("string"));
    assert!(!result.is_valid());
    assert!(result.errors()[0].contains("object"));
}

#[test]
fn test_validation_is_deterministic() {
    let input = json!({"url": 1, "method": "TRACE", "extra": 1});
    let first = validate_against_schema(&schema(), &input);
    let second = validate_against_schema(&schema(), &input);
    assert_eq!(first, second);
}

#[test]
fn test_is_http_url() {
    assert!(is_http_url("https://example.com/path?q=1"));
    assert!(is_http_url("http://localhost:8080"));
    assert!(!is_http_url("ftp://example.com"));
    assert!(!is_http_url("example.com"));
    assert!(!is_http_url(""));
}

#[test]
fn test_is_email() {
    assert!(is_email("jane@example.com"));
    assert!(is_email("first.last+tag@sub.example.org"));
    assert!(!is_email("jane@example"));
    assert!(!is_email("jane example.com"));
    assert!(!is_email("@example.com"));
}

#[test]
fn test_str_field() {
    let input = json!({"name": "x", "count": 1});
    assert_eq!(str_field(&input, "name"), Some("x"));
    assert_eq!(str_field(&input, "count"), None);
    assert_eq!(str_field(&input, "missing"), None);
}
