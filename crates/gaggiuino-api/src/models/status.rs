// Live machine telemetry from `GET /api/system/status`.

use serde::{Deserialize, Serialize};

use crate::wire;

/// One status snapshot.
///
/// The firmware sends every field as a string:
/// ```json
/// { "upTime": "89107", "profileId": "7", "profileName": "OFF",
///   "targetTemperature": "15.000000", "temperature": "22.500000",
///   "pressure": "-0.028054", "waterLevel": "100", "weight": "0.000000",
///   "brewSwitchState": "false", "steamSwitchState": "false" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    /// Seconds since boot.
    #[serde(deserialize_with = "wire::flex_int")]
    pub up_time: u64,
    #[serde(deserialize_with = "wire::flex_int")]
    pub profile_id: u32,
    pub profile_name: String,
    /// Boiler set point in °C.
    #[serde(deserialize_with = "wire::flex_float")]
    pub target_temperature: f64,
    /// Boiler temperature in °C.
    #[serde(deserialize_with = "wire::flex_float")]
    pub temperature: f64,
    /// Bar.
    #[serde(deserialize_with = "wire::flex_float")]
    pub pressure: f64,
    /// Tank level, percent.
    #[serde(deserialize_with = "wire::flex_int")]
    pub water_level: u32,
    /// Grams on the scales.
    #[serde(deserialize_with = "wire::flex_float")]
    pub weight: f64,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub brew_switch_state: bool,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub steam_switch_state: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn wire_status(brew: &str, steam: &str) -> serde_json::Value {
        json!({
            "upTime": "89107",
            "profileId": "7",
            "profileName": "OFF",
            "targetTemperature": "15.000000",
            "temperature": "22.500000",
            "pressure": "-0.028054",
            "waterLevel": "100",
            "weight": "0.000000",
            "brewSwitchState": brew,
            "steamSwitchState": steam,
        })
    }

    #[test]
    fn decodes_stringly_typed_snapshot() {
        let status: DeviceStatus = serde_json::from_value(wire_status("false", "false")).unwrap();

        assert_eq!(status.up_time, 89_107);
        assert_eq!(status.profile_id, 7);
        assert_eq!(status.profile_name, "OFF");
        assert!((status.target_temperature - 15.0).abs() < f64::EPSILON);
        assert!((status.temperature - 22.5).abs() < f64::EPSILON);
        assert!((status.pressure - -0.028_054).abs() < f64::EPSILON);
        assert_eq!(status.water_level, 100);
        assert!(status.weight.abs() < f64::EPSILON);
        assert!(!status.brew_switch_state);
        assert!(!status.steam_switch_state);
    }

    #[test]
    fn switch_states_follow_literal_truth() {
        for (raw, expected) in [
            ("true", true),
            ("True", true),
            ("TRUE", true),
            ("1", true),
            ("false", false),
            ("False", false),
            ("FALSE", false),
            ("0", false),
        ] {
            let status: DeviceStatus = serde_json::from_value(wire_status(raw, raw)).unwrap();
            assert_eq!(status.brew_switch_state, expected, "brew {raw:?}");
            assert_eq!(status.steam_switch_state, expected, "steam {raw:?}");
        }
    }

    #[test]
    fn native_types_are_accepted_too() {
        let status: DeviceStatus = serde_json::from_value(json!({
            "upTime": 100,
            "profileId": 1,
            "profileName": "Test",
            "targetTemperature": 90.0,
            "temperature": 92.5,
            "pressure": 9.5,
            "waterLevel": 50,
            "weight": 25,
            "brewSwitchState": true,
            "steamSwitchState": false,
        }))
        .unwrap();

        assert_eq!(status.profile_id, 1);
        assert!(status.brew_switch_state);
        assert!((status.weight - 25.0).abs() < f64::EPSILON);
    }
}
