//! Validation results and the schema validation engine.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::TaskConfigSchema;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Outcome of a `validate` call.
///
/// `is_valid` is true exactly when there are no errors. Warnings never block
/// execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Append everything from another result.
    pub fn merge(&mut self, other: ValidationResult) {
        for error in other.errors {
            self.add_error(error);
        }
        self.warnings.extend(other.warnings);
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<String>) {
        (self.errors, self.warnings)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a configuration against a task schema.
///
/// Structural rules (object shape, required fields, JSON types, enums,
/// numeric bounds) come from compiling the schema with `jsonschema`.
/// Properties the schema does not know about produce warnings.
pub fn validate_against_schema(schema: &TaskConfigSchema, input: &Value) -> ValidationResult {
    let mut result = ValidationResult::new();

    let Some(object) = input.as_object() else {
        result.add_error("Configuration must be a JSON object");
        return result;
    };

    match jsonschema::validator_for(&compilable_schema(schema)) {
        Ok(validator) => {
            for error in validator.iter_errors(input) {
                let path = error.instance_path.to_string();
                let field = path.trim_start_matches('/');
                if field.is_empty() {
                    result.add_error(error.to_string());
                } else {
                    result.add_error(format!("{}: {}", field, error));
                }
            }
        }
        Err(e) => result.add_error(format!("Task schema could not be compiled: {}", e)),
    }

    for key in object.keys() {
        if !schema.properties.contains_key(key) {
            result.add_warning(format!("Unknown property '{}' will be ignored", key));
        }
    }

    result
}

/// Format hints are advisory for the UI; owning tasks check them with
/// clearer messages, so they are stripped before compiling.
fn compilable_schema(schema: &TaskConfigSchema) -> Value {
    let mut json = schema.to_json_schema();
    if let Some(properties) = json.get_mut("properties").and_then(Value::as_object_mut) {
        for property in properties.values_mut() {
            if let Some(property) = property.as_object_mut() {
                property.remove("format");
            }
        }
    }
    json
}

/// True for absolute `http`/`https` URLs with a host.
pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Loose email pattern check: `local@domain.tld`, no whitespace.
pub fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Borrow a string field from a configuration object.
pub fn str_field<'a>(input: &'a Value, name: &str) -> Option<&'a str> {
    input.get(name).and_then(Value::as_str)
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
