// Brew profiles from `GET /api/profiles/all`.
//
// Phase shapes vary between firmware builds, so a profile keeps its phases
// as opaque JSON. `ProfilePhase` and friends describe the common shape and
// can be decoded on demand with `Profile::typed_phases`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::wire;

// ── Profile ──────────────────────────────────────────────────────────

/// A named brew recipe.
///
/// ```json
/// { "id": 8, "name": "_Long", "selected": true,
///   "globalStopConditions": { "weight": 50 },
///   "phases": [ { "restriction": 2, "skip": false, ... } ],
///   "recipe": {}, "waterTemperature": 90 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "wire::flex_int")]
    pub id: u32,
    pub name: String,
    /// Present in the profile list; absent in shot snapshots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_stop_conditions: Option<Map<String, Value>>,
    /// Ordered phases, kept as opaque JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phases: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Map<String, Value>>,
    /// Water temperature in °C.
    #[serde(
        default,
        deserialize_with = "wire::flex_int_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub water_temperature: Option<i32>,
}

impl Profile {
    /// A bare profile reference: id and name only.
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            selected: None,
            global_stop_conditions: None,
            phases: None,
            recipe: None,
            water_temperature: None,
        }
    }

    /// `true` only if the device flagged this profile as selected.
    pub fn is_selected(&self) -> bool {
        self.selected == Some(true)
    }

    /// Decode the opaque phases into [`ProfilePhase`] records.
    ///
    /// Returns an empty list when the profile carries no phases.
    pub fn typed_phases(&self) -> Result<Vec<ProfilePhase>, serde_json::Error> {
        self.phases
            .iter()
            .flatten()
            .map(|phase| ProfilePhase::deserialize(phase))
            .collect()
    }
}

/// A profile given either as a full record or by id.
///
/// Select and delete only need the id; both forms normalise to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfileRef<'a> {
    Id(u32),
    Record(&'a Profile),
}

impl ProfileRef<'_> {
    pub fn id(&self) -> u32 {
        match self {
            Self::Id(id) => *id,
            Self::Record(profile) => profile.id,
        }
    }
}

impl From<u32> for ProfileRef<'_> {
    fn from(id: u32) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a Profile> for ProfileRef<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self::Record(profile)
    }
}

// ── Phase schema sketch ──────────────────────────────────────────────

/// What a phase regulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseType {
    Flow,
    Pressure,
}

/// One stage of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePhase {
    #[serde(rename = "type")]
    pub phase_type: PhaseType,
    /// Limit applied to the non-target variable (pressure for flow phases
    /// and vice versa).
    #[serde(default)]
    pub restriction: Option<f64>,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub stop_conditions: StopConditions,
    pub target: PhaseTarget,
}

/// Thresholds that end a phase early. Any that is set may trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopConditions {
    /// Bar.
    #[serde(default)]
    pub pressure_above: Option<f64>,
    /// Bar.
    #[serde(default)]
    pub pressure_below: Option<f64>,
    /// Milliseconds.
    #[serde(default)]
    pub time: Option<u64>,
    /// Grams in the cup.
    #[serde(default)]
    pub weight: Option<f64>,
    /// Millilitres pumped.
    #[serde(default)]
    pub water_pumped_in_phase: Option<f64>,
}

/// The curve a phase follows towards its end value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseTarget {
    /// `INSTANT`, `LINEAR`, `EASE_IN`, `EASE_OUT`, `EASE_IN_OUT`.
    pub curve: String,
    pub end: f64,
    #[serde(default)]
    pub start: Option<f64>,
    /// Ramp duration in milliseconds.
    #[serde(default)]
    pub time: Option<u64>,
}
