use super::{MetricType, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const METRIC_KEY_PREFIX: &str = "health_";
pub const QUEUE_KEY_PREFIX: &str = "syncq_";
pub const METADATA_KEY_PREFIX: &str = "cache_meta_";

/// Composite key under which an entry lives in the key-value store.
///
/// Layout: `health_<owner>_<type>_<metricId>` for cached metrics,
/// `syncq_<owner>_<itemId>` for queue items, `cache_meta_<owner>` for the
/// per-owner metadata record. The store owns the bytes; this type owns the
/// layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_metric(owner: &UserId, metric_type: MetricType, metric_id: &str) -> Self {
        Self(format!(
            "{METRIC_KEY_PREFIX}{owner}_{metric_type}_{metric_id}"
        ))
    }

    pub fn for_queue_item(owner: &UserId, item_id: &str) -> Self {
        Self(format!("{QUEUE_KEY_PREFIX}{owner}_{item_id}"))
    }

    pub fn for_metadata(owner: &UserId) -> Self {
        Self(format!("{METADATA_KEY_PREFIX}{owner}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Glob over store keys; `*` matches any run of characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern(String);

impl KeyPattern {
    pub fn owner_metrics(owner: &UserId) -> Self {
        Self(format!("{METRIC_KEY_PREFIX}{owner}_*"))
    }

    pub fn typed_metrics(owner: &UserId, metric_type: MetricType) -> Self {
        Self(format!("{METRIC_KEY_PREFIX}{owner}_{metric_type}_*"))
    }

    pub fn owner_queue(owner: &UserId) -> Self {
        Self(format!("{QUEUE_KEY_PREFIX}{owner}_*"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, key: &str) -> bool {
        let segments: Vec<&str> = self.0.split('*').collect();
        if segments.len() == 1 {
            return key == self.0;
        }

        // First segment is anchored at the start, last at the end; everything
        // in between floats.
        let first = segments[0];
        let last = segments[segments.len() - 1];
        if !key.starts_with(first) {
            return false;
        }
        let mut rest = &key[first.len()..];

        for segment in &segments[1..segments.len() - 1] {
            if segment.is_empty() {
                continue;
            }
            match rest.find(segment) {
                Some(pos) => rest = &rest[pos + segment.len()..],
                None => return false,
            }
        }

        last.is_empty() || rest.ends_with(last)
    }
}

impl fmt::Display for KeyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
