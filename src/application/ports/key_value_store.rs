use crate::domain::value_objects::KeyPattern;
use crate::shared::error::OfflineError;
use async_trait::async_trait;

/// Generic string-keyed persistent store the cache and queue are built on.
///
/// Guarantees per-key atomicity and nothing more: no ordering across keys, no
/// transactions. Every call is a suspension point, so a scan-then-delete
/// sequence can interleave with concurrent writers.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn put(&self, key: &str, value: &str) -> Result<(), OfflineError>;
    async fn get(&self, key: &str) -> Result<Option<String>, OfflineError>;
    async fn remove(&self, key: &str) -> Result<(), OfflineError>;
    async fn keys_matching(&self, pattern: &KeyPattern) -> Result<Vec<String>, OfflineError>;
}
