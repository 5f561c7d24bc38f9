use crate::domain::value_objects::{DataSource, MetricType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One health reading as delivered by a platform or manual entry.
///
/// Metrics are immutable; a newer reading supersedes an older one by being a
/// separate record with a later timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthMetric {
    pub id: String,
    pub user_id: String,
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
    pub source: DataSource,
    pub confidence: f32,
}

impl HealthMetric {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        user_id: String,
        metric_type: MetricType,
        value: f64,
        unit: String,
        timestamp: DateTime<Utc>,
        source: DataSource,
        confidence: f32,
    ) -> Self {
        Self {
            id,
            user_id,
            metric_type,
            value,
            unit,
            timestamp,
            source,
            confidence,
        }
    }
}
