use serde::{Deserialize, Serialize};
use std::fmt;

/// Kinds of health metrics the cache can hold.
///
/// `as_str` tokens are embedded in cache keys, so they must stay stable
/// across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    HeartRate,
    Steps,
    Weight,
    CaloriesBurned,
    BloodPressure,
    BloodGlucose,
    BodyFatPercentage,
    SleepDuration,
    ExerciseDuration,
    Hydration,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::HeartRate => "heart_rate",
            MetricType::Steps => "steps",
            MetricType::Weight => "weight",
            MetricType::CaloriesBurned => "calories_burned",
            MetricType::BloodPressure => "blood_pressure",
            MetricType::BloodGlucose => "blood_glucose",
            MetricType::BodyFatPercentage => "body_fat_percentage",
            MetricType::SleepDuration => "sleep_duration",
            MetricType::ExerciseDuration => "exercise_duration",
            MetricType::Hydration => "hydration",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
