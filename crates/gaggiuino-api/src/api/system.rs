// Health and firmware endpoints
//
// These answer small untyped objects, returned as JSON maps.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::api::client::GaggiuinoApi;
use crate::error::Error;

impl GaggiuinoApi {
    /// Liveness check.
    ///
    /// `GET /api/health`, answering `{"status": "ok"}` when all is well.
    pub async fn get_health(&self) -> Result<Option<Map<String, Value>>, Error> {
        self.get_json("health").await
    }

    /// `true` iff the health check reports `status == "ok"`.
    ///
    /// Errors propagate; a response with no data counts as unhealthy.
    pub async fn healthy(&self) -> Result<bool, Error> {
        let health = self.get_health().await?;
        Ok(health
            .as_ref()
            .and_then(|h| h.get("status"))
            .and_then(Value::as_str)
            == Some("ok"))
    }

    /// Start a firmware update of every component.
    ///
    /// `POST /api/firmware/update-all` with `{"version": "<v>"}`; no
    /// version means `"latest"`.
    pub async fn update_firmware(&self, version: Option<&str>) -> Result<bool, Error> {
        let version = version.unwrap_or("latest");
        debug!(version, "requesting firmware update");
        self.post_json("firmware/update-all", &json!({ "version": version }))
            .await
    }

    /// Poll a running firmware update.
    ///
    /// `GET /api/firmware/progress`, e.g.
    /// `{"progress": 0, "status": "IDLE", "type": "F_FW"}`. Read the state
    /// with [`FirmwareState::of`](crate::FirmwareState::of).
    pub async fn get_firmware_progress(&self) -> Result<Option<Map<String, Value>>, Error> {
        self.get_json("firmware/progress").await
    }
}
