// Device settings from `GET /api/settings` and `GET|POST /api/settings/{category}`.
//
// Each category is fetched and written independently. Booleans are not
// encoded the same way everywhere: boiler and display send "true"/"false"
// strings and get them back unchanged, the others are written as native
// JSON booleans. Reads accept either.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::wire;

// ── Categories ───────────────────────────────────────────────────────

/// One independently addressable partition of device configuration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SettingsCategory {
    Boiler,
    System,
    Led,
    Scales,
    Display,
    Theme,
    Versions,
}

impl SettingsCategory {
    /// Path below `/api`, e.g. `settings/boiler`.
    pub fn path(self) -> String {
        format!("settings/{self}")
    }

    /// Versions is read-only; everything else accepts a POST.
    pub fn is_writable(self) -> bool {
        !matches!(self, Self::Versions)
    }
}

/// A typed settings category with its wire mapping.
pub trait SettingsRecord: Serialize + DeserializeOwned {
    const CATEGORY: SettingsCategory;

    fn from_wire(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// The JSON object the update endpoint expects.
    fn to_wire(&self) -> Result<Map<String, Value>, serde_json::Error> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "{} settings serialized to a non-object: {other}",
                Self::CATEGORY
            ))),
        }
    }
}

/// Categories the device lets you write.
pub trait WritableSettings: SettingsRecord {}

// ── Boiler ───────────────────────────────────────────────────────────

/// Heating parameters. Booleans round-trip as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoilerSettings {
    /// °C.
    #[serde(deserialize_with = "wire::flex_int")]
    pub steam_set_point: i32,
    #[serde(deserialize_with = "wire::flex_int")]
    pub offset_temp: i32,
    /// Heater power, watts.
    #[serde(deserialize_with = "wire::flex_int")]
    pub hpwr: i32,
    #[serde(deserialize_with = "wire::flex_int")]
    pub main_divider: i32,
    #[serde(deserialize_with = "wire::flex_int")]
    pub brew_divider: i32,
    #[serde(with = "wire::string_bool")]
    pub brew_delta_state: bool,
    #[serde(with = "wire::string_bool")]
    pub dream_steam_state: bool,
    #[serde(deserialize_with = "wire::flex_int")]
    pub startup_heat_delta: i32,
}

impl SettingsRecord for BoilerSettings {
    const CATEGORY: SettingsCategory = SettingsCategory::Boiler;
}
impl WritableSettings for BoilerSettings {}

// ── System ───────────────────────────────────────────────────────────

/// Firmware update channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseChannel {
    Stable,
    Test,
    Debug,
    Other(u8),
}

impl From<u8> for ReleaseChannel {
    fn from(raw: u8) -> Self {
        match raw {
            0 => Self::Stable,
            1 => Self::Test,
            2 => Self::Debug,
            n => Self::Other(n),
        }
    }
}

impl From<ReleaseChannel> for u8 {
    fn from(channel: ReleaseChannel) -> Self {
        match channel {
            ReleaseChannel::Stable => 0,
            ReleaseChannel::Test => 1,
            ReleaseChannel::Debug => 2,
            ReleaseChannel::Other(n) => n,
        }
    }
}

impl Serialize for ReleaseChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for ReleaseChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: u8 = wire::flex_int(deserializer)?;
        Ok(Self::from(raw))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    #[serde(deserialize_with = "wire::flex_float")]
    pub pump_flow_at_zero: f64,
    #[serde(deserialize_with = "wire::flex_int")]
    pub timezone_offset_minutes: i32,
    #[serde(default)]
    pub sprofiler_token: String,
    #[serde(default)]
    pub visualizer_token: String,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub services_state: bool,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub wifi_enabled: bool,
    pub release_channel: ReleaseChannel,
}

impl SettingsRecord for SystemSettings {
    const CATEGORY: SettingsCategory = SettingsCategory::System;
}
impl WritableSettings for SystemSettings {}

// ── LED ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedColor {
    #[serde(rename = "R", deserialize_with = "wire::flex_int")]
    pub r: u8,
    #[serde(rename = "G", deserialize_with = "wire::flex_int")]
    pub g: u8,
    #[serde(rename = "B", deserialize_with = "wire::flex_int")]
    pub b: u8,
}

/// Time-of-flight sensor range, millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TofSettings {
    #[serde(deserialize_with = "wire::flex_int")]
    pub max: u32,
    #[serde(deserialize_with = "wire::flex_int")]
    pub min: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedSettings {
    pub color: LedColor,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub state: bool,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub disco: bool,
    pub tof: TofSettings,
}

impl SettingsRecord for LedSettings {
    const CATEGORY: SettingsCategory = SettingsCategory::Led;
}
impl WritableSettings for LedSettings {}

// ── Scales ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalesSettings {
    #[serde(deserialize_with = "wire::flex_bool")]
    pub force_predictive: bool,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub hw_scales_enabled: bool,
    /// Load cell calibration factor.
    #[serde(rename = "hwScalesF1", deserialize_with = "wire::flex_int")]
    pub hw_scales_f1: i32,
    #[serde(rename = "hwScalesF2", deserialize_with = "wire::flex_int")]
    pub hw_scales_f2: i32,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub bt_scales_enabled: bool,
    #[serde(deserialize_with = "wire::flex_bool")]
    pub bt_scales_auto_connect: bool,
}

impl SettingsRecord for ScalesSettings {
    const CATEGORY: SettingsCategory = SettingsCategory::Scales;
}
impl WritableSettings for ScalesSettings {}

// ── Display ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    /// 0-100.
    #[serde(deserialize_with = "wire::flex_int")]
    pub lcd_brightness: u8,
    /// Written back as `"true"`/`"false"`, the form the device sends.
    #[serde(with = "wire::string_bool")]
    pub lcd_dark_mode: bool,
    /// Minutes before the screen sleeps.
    #[serde(deserialize_with = "wire::flex_int")]
    pub lcd_sleep: u32,
    /// Seconds after a shot before the graph closes.
    #[serde(deserialize_with = "wire::flex_int")]
    pub lcd_go_home: u32,
}

impl SettingsRecord for DisplaySettings {
    const CATEGORY: SettingsCategory = SettingsCategory::Display;
}
impl WritableSettings for DisplaySettings {}

// ── Theme ────────────────────────────────────────────────────────────

/// Screen colours, RGB565.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    #[serde(deserialize_with = "wire::flex_int")]
    pub colour_primary: u16,
    #[serde(deserialize_with = "wire::flex_int")]
    pub colour_secondary: u16,
}

impl SettingsRecord for ThemeSettings {
    const CATEGORY: SettingsCategory = SettingsCategory::Theme;
}
impl WritableSettings for ThemeSettings {}

// ── Versions ─────────────────────────────────────────────────────────

/// Build identifiers of the firmware components. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Versions {
    pub core_version: String,
    pub front_version: String,
    pub static_version: String,
}

impl SettingsRecord for Versions {
    const CATEGORY: SettingsCategory = SettingsCategory::Versions;
}

// ── Aggregate ────────────────────────────────────────────────────────

/// Every category at once, from `GET /api/settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub boiler: BoilerSettings,
    pub system: SystemSettings,
    pub led: LedSettings,
    pub scales: ScalesSettings,
    pub display: DisplaySettings,
    pub theme: ThemeSettings,
    pub versions: Versions,
}

impl Settings {
    /// One category as wire JSON.
    pub fn category(&self, category: SettingsCategory) -> Result<Map<String, Value>, serde_json::Error> {
        match category {
            SettingsCategory::Boiler => self.boiler.to_wire(),
            SettingsCategory::System => self.system.to_wire(),
            SettingsCategory::Led => self.led.to_wire(),
            SettingsCategory::Scales => self.scales.to_wire(),
            SettingsCategory::Display => self.display.to_wire(),
            SettingsCategory::Theme => self.theme.to_wire(),
            SettingsCategory::Versions => self.versions.to_wire(),
        }
    }
}
