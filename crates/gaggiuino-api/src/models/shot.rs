// Shot history from `GET /api/shots/{id}` and `GET /api/shots/latest`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Profile;
use crate::wire;

/// One recorded brew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(deserialize_with = "wire::flex_int")]
    pub id: u32,
    /// Tenths of a second.
    #[serde(deserialize_with = "wire::flex_int")]
    pub duration: u32,
    /// Unix seconds.
    #[serde(deserialize_with = "wire::flex_int")]
    pub timestamp: i64,
    #[serde(default)]
    pub datapoints: ShotDatapoints,
    /// The profile as it was when the shot was pulled, kept as opaque JSON.
    #[serde(default)]
    pub profile: Value,
}

impl Shot {
    /// When the shot was recorded, or `None` if the timestamp is out of range.
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// Decode the embedded profile snapshot.
    pub fn profile_snapshot(&self) -> Result<Profile, serde_json::Error> {
        Profile::deserialize(&self.profile)
    }
}

/// Per-sample telemetry captured during a shot.
///
/// Every series is indexed by sample; `time_in_shot` holds the sample
/// times. Values are fixed-point as the firmware records them (pressure in
/// tenths of a bar, temperature in tenths of a degree, and so on).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotDatapoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pump_flow: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shot_weight: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pressure: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_pump_flow: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_temperature: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_shot: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_pumped: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_flow: Option<Vec<f64>>,
}

impl ShotDatapoints {
    /// Number of samples: the length of the longest series present.
    pub fn len(&self) -> usize {
        [
            &self.pressure,
            &self.pump_flow,
            &self.shot_weight,
            &self.target_pressure,
            &self.target_pump_flow,
            &self.target_temperature,
            &self.temperature,
            &self.time_in_shot,
            &self.water_pumped,
            &self.weight_flow,
        ]
        .into_iter()
        .flatten()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pointer to the most recent shot.
///
/// `GET /api/shots/latest` answers `[{"lastShotId": "100"}]`; fetch the
/// full record with [`get_shot`](crate::GaggiuinoApi::get_shot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestShotResult {
    #[serde(with = "wire::string_int")]
    pub last_shot_id: u32,
}
