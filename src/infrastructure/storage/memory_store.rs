use crate::application::ports::KeyValueStore;
use crate::domain::value_objects::KeyPattern;
use crate::shared::error::OfflineError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// HashMap-backed store. Used in tests and as a throwaway cache for hosts
/// that do not want a database file.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn put(&self, key: &str, value: &str) -> Result<(), OfflineError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, OfflineError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), OfflineError> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn keys_matching(&self, pattern: &KeyPattern) -> Result<Vec<String>, OfflineError> {
        let entries = self.entries.read().await;
        Ok(entries
            .keys()
            .filter(|key| pattern.matches(key))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{MetricType, UserId};

    #[tokio::test]
    async fn put_get_remove_round_trip() {
        let store = MemoryKeyValueStore::new();
        store.put("health_u1_steps_m1", "{}").await.unwrap();
        assert_eq!(
            store.get("health_u1_steps_m1").await.unwrap().as_deref(),
            Some("{}")
        );

        store.remove("health_u1_steps_m1").await.unwrap();
        assert!(store.get("health_u1_steps_m1").await.unwrap().is_none());
        // Removing an absent key is a no-op.
        store.remove("health_u1_steps_m1").await.unwrap();
    }

    #[tokio::test]
    async fn keys_matching_filters_by_pattern() {
        let store = MemoryKeyValueStore::new();
        let owner = UserId::new("u1".into()).unwrap();
        store.put("health_u1_steps_m1", "a").await.unwrap();
        store.put("health_u1_weight_m2", "b").await.unwrap();
        store.put("health_u2_steps_m3", "c").await.unwrap();
        store.put("syncq_u1_i1", "d").await.unwrap();

        let mut keys = store
            .keys_matching(&KeyPattern::owner_metrics(&owner))
            .await
            .unwrap();
        keys.sort();
        assert_eq!(keys, vec!["health_u1_steps_m1", "health_u1_weight_m2"]);

        let keys = store
            .keys_matching(&KeyPattern::typed_metrics(&owner, MetricType::Weight))
            .await
            .unwrap();
        assert_eq!(keys, vec!["health_u1_weight_m2"]);
    }
}
