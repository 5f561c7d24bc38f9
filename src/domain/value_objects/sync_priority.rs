use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority of a queued sync operation.
///
/// Queue drains highest rank first; ties are broken oldest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPriority {
    Low,
    Normal,
    High,
    Critical,
}

impl SyncPriority {
    pub fn rank(&self) -> u8 {
        match self {
            SyncPriority::Low => 0,
            SyncPriority::Normal => 1,
            SyncPriority::High => 2,
            SyncPriority::Critical => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncPriority::Low => "low",
            SyncPriority::Normal => "normal",
            SyncPriority::High => "high",
            SyncPriority::Critical => "critical",
        }
    }
}

impl Default for SyncPriority {
    fn default() -> Self {
        SyncPriority::Normal
    }
}

impl fmt::Display for SyncPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
