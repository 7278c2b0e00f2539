// Typed records for every resource the controller exposes.
//
// Field names follow Rust conventions; `serde` renames map them back to the
// firmware's camelCase keys. Decoding goes through the coercion helpers in
// `crate::wire` because the firmware is inconsistent about JSON types.

mod profile;
mod settings;
mod shot;
mod status;
mod system;

pub use profile::{PhaseTarget, PhaseType, Profile, ProfilePhase, ProfileRef, StopConditions};
pub use settings::{
    BoilerSettings, DisplaySettings, LedColor, LedSettings, ReleaseChannel, ScalesSettings,
    Settings, SettingsCategory, SettingsRecord, SystemSettings, ThemeSettings, TofSettings,
    Versions, WritableSettings,
};
pub use shot::{LatestShotResult, Shot, ShotDatapoints};
pub use status::DeviceStatus;
pub use system::FirmwareState;
