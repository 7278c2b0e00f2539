// Health and firmware endpoints. Both answer small untyped objects.

use std::fmt;

use serde_json::{Map, Value};

/// Device-reported state of a firmware update, read from the `status`
/// field of `GET /api/firmware/progress`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FirmwareState {
    Idle,
    InProgress,
    Error,
    /// A status tag this client does not know, kept verbatim.
    Other(String),
}

impl FirmwareState {
    /// Read the state from a progress object. `None` if `status` is missing
    /// or not a string.
    pub fn of(progress: &Map<String, Value>) -> Option<Self> {
        progress.get("status").and_then(Value::as_str).map(Self::from)
    }

    pub fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl From<&str> for FirmwareState {
    fn from(raw: &str) -> Self {
        match raw {
            "IDLE" => Self::Idle,
            "IN_PROGRESS" => Self::InProgress,
            "ERROR" => Self::Error,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for FirmwareState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("IDLE"),
            Self::InProgress => f.write_str("IN_PROGRESS"),
            Self::Error => f.write_str("ERROR"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}
