//! In-memory [`KeyValueStore`] with TTL.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use taskflow_protocols::{IntegrationError, KeyValueStore};

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Process-local store. Expired entries read as absent and are purged lazily.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (unexpired) entries.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every expired entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKvStore {
    fn id(&self) -> &str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, IntegrationError> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        debug!(key = %key, "Purging expired key");
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.is_expired(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(
        &self,
        key: &str,
        value: Value,
        ttl: Option<Duration>,
    ) -> Result<(), IntegrationError> {
        let expires_at = match ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| IntegrationError::Rejected(format!("TTL out of range: {}", e)))?;
                let expires_at = Utc::now().checked_add_signed(ttl).ok_or_else(|| {
                    IntegrationError::Rejected(format!("TTL of {}s is out of range", ttl.num_seconds()))
                })?;
                Some(expires_at)
            }
            None => None,
        };

        self.entries
            .write()
            .await
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, IntegrationError> {
        let now = Utc::now();
        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|e| !e.is_expired(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get() {
        let store = InMemoryKvStore::new();
        store.set("a", json!({"n": 1}), None).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!({"n": 1})));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = InMemoryKvStore::new();
        store.set("a", json!(1), None).await.unwrap();
        store.set("a", json!(2), None).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn test_expired_entry_reads_absent() {
        let store = InMemoryKvStore::new();
        store.set("a", json!(1), Some(Duration::ZERO)).await.unwrap();
        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.entries.read().await.len(), 0);
    }

    #[tokio::test]
    async fn test_ttl_not_yet_expired() {
        let store = InMemoryKvStore::new();
        store
            .set("a", json!(1), Some(Duration::from_secs(3600)))
            .await
            .unwrap();
        assert_eq!(store.get("a").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn test_ttl_out_of_range_rejected() {
        let store = InMemoryKvStore::new();
        let result = store
            .set("a", json!(1), Some(Duration::from_secs(u64::MAX / 2)))
            .await;
        assert!(matches!(result, Err(IntegrationError::Rejected(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryKvStore::new();
        store.set("a", json!(1), None).await.unwrap();
        assert!(store.delete("a").await.unwrap());
        assert!(!store.delete("a").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = InMemoryKvStore::new();
        store.set("old", json!(1), Some(Duration::ZERO)).await.unwrap();
        store.set("new", json!(2), None).await.unwrap();
        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
    }
}
