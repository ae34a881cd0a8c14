//! Key-value store integration protocol.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::IntegrationError;

/// Key-value capability consumed by storage tasks.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Fetch a value. Expired entries read as absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, IntegrationError>;

    /// Store a value, optionally expiring after `ttl`.
    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<(), IntegrationError>;

    /// Remove a value. Returns whether it existed.
    async fn delete(&self, key: &str) -> Result<bool, IntegrationError>;
}
