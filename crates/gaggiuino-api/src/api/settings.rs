// Settings endpoints
//
// One GET/POST pair per category plus the aggregate `GET /api/settings`.
// The generic methods take the category from the record type, so a
// read-only category (versions) has no way to reach the update path.

use serde_json::{Map, Value};
use tracing::debug;

use crate::api::client::GaggiuinoApi;
use crate::error::Error;
use crate::models::{
    BoilerSettings, DisplaySettings, LedSettings, ScalesSettings, Settings, SettingsRecord,
    SystemSettings, ThemeSettings, Versions, WritableSettings,
};

impl GaggiuinoApi {
    /// Fetch every category in one request.
    ///
    /// `GET /api/settings`
    pub async fn get_settings(&self) -> Result<Option<Settings>, Error> {
        debug!("fetching all settings");
        self.get_json("settings").await
    }

    /// Fetch one category, picked by record type.
    ///
    /// `GET /api/settings/{category}`
    pub async fn get_category<S: SettingsRecord>(&self) -> Result<Option<S>, Error> {
        debug!(category = %S::CATEGORY, "fetching settings");
        self.get_json(&S::CATEGORY.path()).await
    }

    /// Write one category from its typed record.
    ///
    /// `POST /api/settings/{category}` with the record's wire JSON.
    pub async fn update_category<S: WritableSettings>(&self, settings: &S) -> Result<bool, Error> {
        let body = settings.to_wire()?;
        self.update_category_raw::<S>(&body).await
    }

    /// Write one category from a raw JSON object, sent as-is.
    pub async fn update_category_raw<S: WritableSettings>(
        &self,
        body: &Map<String, Value>,
    ) -> Result<bool, Error> {
        debug!(category = %S::CATEGORY, keys = body.len(), "updating settings");
        self.post_json(&S::CATEGORY.path(), body).await
    }

    // ── Per-category shorthands ──────────────────────────────────────

    pub async fn get_boiler_settings(&self) -> Result<Option<BoilerSettings>, Error> {
        self.get_category().await
    }

    pub async fn update_boiler_settings(&self, settings: &BoilerSettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    pub async fn get_system_settings(&self) -> Result<Option<SystemSettings>, Error> {
        self.get_category().await
    }

    pub async fn update_system_settings(&self, settings: &SystemSettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    pub async fn get_led_settings(&self) -> Result<Option<LedSettings>, Error> {
        self.get_category().await
    }

    pub async fn update_led_settings(&self, settings: &LedSettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    pub async fn get_scales_settings(&self) -> Result<Option<ScalesSettings>, Error> {
        self.get_category().await
    }

    pub async fn update_scales_settings(&self, settings: &ScalesSettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    pub async fn get_display_settings(&self) -> Result<Option<DisplaySettings>, Error> {
        self.get_category().await
    }

    pub async fn update_display_settings(&self, settings: &DisplaySettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    pub async fn get_theme_settings(&self) -> Result<Option<ThemeSettings>, Error> {
        self.get_category().await
    }

    pub async fn update_theme_settings(&self, settings: &ThemeSettings) -> Result<bool, Error> {
        self.update_category(settings).await
    }

    /// Firmware build identifiers. There is no matching update.
    ///
    /// `GET /api/settings/versions`
    pub async fn get_versions(&self) -> Result<Option<Versions>, Error> {
        self.get_category().await
    }
}
