// Profile endpoints
//
// Listing, selecting and deleting brew profiles. Select and delete share
// the `profile-select/{id}` path and differ only by verb.

use tracing::debug;

use crate::api::client::GaggiuinoApi;
use crate::error::Error;
use crate::models::{Profile, ProfileRef};

impl GaggiuinoApi {
    /// List every profile stored on the machine.
    ///
    /// `GET /api/profiles/all`
    ///
    /// The result is remembered for [`current_profile`](Self::current_profile).
    pub async fn get_profiles(&self) -> Result<Option<Vec<Profile>>, Error> {
        debug!("listing profiles");
        let profiles: Option<Vec<Profile>> = self.get_json("profiles/all").await?;
        if profiles.is_some() {
            self.remember_profiles(profiles.as_deref());
        }
        Ok(profiles)
    }

    /// Make a profile the active one.
    ///
    /// `POST /api/profile-select/{id}`
    pub async fn select_profile<'a>(&self, profile: impl Into<ProfileRef<'a>>) -> Result<bool, Error> {
        let id = profile.into().id();
        debug!(id, "selecting profile");
        self.post(&format!("profile-select/{id}")).await
    }

    /// Remove a profile from the machine.
    ///
    /// `DELETE /api/profile-select/{id}`
    pub async fn delete_profile<'a>(&self, profile: impl Into<ProfileRef<'a>>) -> Result<bool, Error> {
        let id = profile.into().id();
        debug!(id, "deleting profile");
        self.delete(&format!("profile-select/{id}")).await
    }
}
