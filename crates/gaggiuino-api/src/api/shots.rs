// Shot endpoints and the status snapshot.
//
// Both `shots/latest` and `system/status` answer a one-element list; the
// element is unwrapped and an empty list means "nothing to report".

use tracing::debug;

use crate::api::client::GaggiuinoApi;
use crate::error::Error;
use crate::models::{DeviceStatus, LatestShotResult, Shot};

impl GaggiuinoApi {
    /// Fetch one recorded shot.
    ///
    /// `GET /api/shots/{id}`
    pub async fn get_shot(&self, id: u32) -> Result<Option<Shot>, Error> {
        let shot = self.get_json(&format!("shots/{id}")).await?;
        if shot.is_none() {
            debug!(id, "no data for shot");
        }
        Ok(shot)
    }

    /// Fetch the id of the most recent shot.
    ///
    /// `GET /api/shots/latest`
    ///
    /// Only the pointer comes back; pass its id to [`get_shot`](Self::get_shot)
    /// for the full record.
    pub async fn get_latest_shot_id(&self) -> Result<Option<LatestShotResult>, Error> {
        let latest = first(self.get_json("shots/latest").await?);
        if latest.is_none() {
            debug!("no latest shot reported");
        }
        Ok(latest)
    }

    /// Fetch a live telemetry snapshot.
    ///
    /// `GET /api/system/status`
    ///
    /// A snapshot is remembered for [`current_profile`](Self::current_profile);
    /// an empty answer leaves the previous one in place.
    pub async fn get_status(&self) -> Result<Option<DeviceStatus>, Error> {
        let status = first(self.get_json("system/status").await?);
        if status.is_some() {
            self.remember_status(status.as_ref());
        }
        Ok(status)
    }
}

/// Unwrap a one-element list wrapper.
fn first<T>(wrapped: Option<Vec<T>>) -> Option<T> {
    wrapped.and_then(|items| items.into_iter().next())
}
