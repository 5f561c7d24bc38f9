use crate::domain::entities::SyncQueueItem;
use crate::shared::error::OfflineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of one network transfer as reported by the platform gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOutcome {
    Success,
    Conflict,
    Error { message: String },
    PartialSuccess { success_count: u32, failure_count: u32 },
}

/// Collaborator that performs the actual upload to a health platform.
///
/// The queue never talks to the network itself; it hands items here and
/// interprets the outcome.
#[async_trait]
pub trait SyncGateway: Send + Sync {
    async fn upload(&self, item: &SyncQueueItem) -> Result<SyncOutcome, OfflineError>;
}
