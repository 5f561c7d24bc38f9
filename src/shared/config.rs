use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfflineConfig {
    pub cache: CacheConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Hours a cached metric stays live. 0 means entries expire immediately.
    pub default_ttl_hours: i64,
    pub max_cache_size_mb: u64,
    pub status_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub max_retries: u32,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig {
                default_ttl_hours: 24,
                max_cache_size_mb: 50,
                status_interval_secs: 30,
            },
            sync: SyncConfig {
                auto_sync: true,
                max_retries: 3,
            },
        }
    }
}

impl CacheConfig {
    pub fn max_cache_size_bytes(&self) -> u64 {
        self.max_cache_size_mb * 1024 * 1024
    }
}
