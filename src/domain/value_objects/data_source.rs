use serde::{Deserialize, Serialize};
use std::fmt;

/// Platform a health metric was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    HealthConnect,
    SamsungHealth,
    GarminConnect,
    Manual,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSource::HealthConnect => "health_connect",
            DataSource::SamsungHealth => "samsung_health",
            DataSource::GarminConnect => "garmin_connect",
            DataSource::Manual => "manual",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
