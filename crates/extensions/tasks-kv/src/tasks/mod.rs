//! Key-value task implementations.

mod delete;
mod get;
mod set;

pub use delete::KvDeleteTask;
pub use get::KvGetTask;
pub use set::{KvSetTask, MAX_TTL_HOURS};

use serde_json::Value;

use taskflow_protocols::task::str_field;
use taskflow_protocols::{PropertySchema, TaskError, ValidationResult};

const MAX_KEY_LEN: usize = 512;

pub(crate) fn key_property() -> PropertySchema {
    PropertySchema::string()
        .title("Key")
        .description("Store key")
        .example("customer:42")
}

pub(crate) fn validate_key(input: &Value, result: &mut ValidationResult) {
    if let Some(key) = str_field(input, "key") {
        if key.trim().is_empty() {
            result.add_error("key: cannot be empty");
        } else if key.len() > MAX_KEY_LEN {
            result.add_error(format!("key: longer than {} bytes", MAX_KEY_LEN));
        }
    }
}

pub(crate) fn key_of(input: &Value) -> Result<&str, TaskError> {
    str_field(input, "key")
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| TaskError::InvalidInput("key is required".to_string()))
}

#[cfg(test)]
#[path = "kv_tests.rs"]
mod tests;
