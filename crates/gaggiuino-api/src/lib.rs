// gaggiuino-api: Async Rust client for the Gaggiuino espresso controller REST API

pub mod api;
pub mod error;
pub mod models;
pub mod transport;
pub mod wire;

pub use api::{DEFAULT_BASE_URL, GaggiuinoApi, Session};
pub use error::Error;
pub use models::{
    DeviceStatus, FirmwareState, LatestShotResult, Profile, ProfileRef, Settings,
    SettingsCategory, SettingsRecord, Shot, WritableSettings,
};
pub use transport::{DEFAULT_TIMEOUT, RequestTimeout, TimeoutDescriptor, TransportConfig};
