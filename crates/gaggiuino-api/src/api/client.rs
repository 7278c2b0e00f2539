// Gaggiuino REST client
//
// Owns the session lifecycle and the single request path every endpoint
// goes through. Endpoint groups (profiles, shots, settings, system) are
// implemented as inherent methods in sibling files so this module stays
// focused on transport mechanics.

use std::ops::Deref;
use std::sync::{PoisonError, RwLock};

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::{DeviceStatus, Profile};
use crate::transport::TransportConfig;

/// Where the controller answers on a stock install.
pub const DEFAULT_BASE_URL: &str = "http://gaggiuino.local";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The HTTP client behind a session, and whether we created it.
#[derive(Default)]
struct SessionState {
    client: Option<reqwest::Client>,
    owned: bool,
}

/// Async client for a Gaggiuino espresso controller.
///
/// Every call is a single request/response exchange against
/// `{base_url}/api`. The session must be open: call
/// [`connect`](Self::connect), or hold a [`Session`] guard. Calls on a
/// closed session fail with [`Error::Connection`].
///
/// The last status snapshot and profile list are remembered so that
/// [`current_profile`](Self::current_profile) can answer without a request.
pub struct GaggiuinoApi {
    base_url: Url,
    api_url: Url,
    transport: TransportConfig,
    session: RwLock<SessionState>,
    last_status: RwLock<Option<DeviceStatus>>,
    last_profiles: RwLock<Option<Vec<Profile>>>,
}

impl GaggiuinoApi {
    /// Create a client for the controller at `base_url`.
    ///
    /// Trailing slashes are ignored; `/api` is appended for every call.
    pub fn new(base_url: &str, transport: TransportConfig) -> Result<Self, Error> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed)?;
        let api_url = Url::parse(&format!("{trimmed}/api/"))?;

        Ok(Self {
            base_url,
            api_url,
            transport,
            session: RwLock::new(SessionState::default()),
            last_status: RwLock::new(None),
            last_profiles: RwLock::new(None),
        })
    }

    /// Create a client that borrows an externally built `reqwest::Client`.
    ///
    /// The session counts as open immediately, and
    /// [`disconnect`](Self::disconnect) leaves the client alone. The
    /// timeout from `transport` is still applied per request.
    pub fn with_client(
        base_url: &str,
        http: reqwest::Client,
        transport: TransportConfig,
    ) -> Result<Self, Error> {
        let api = Self::new(base_url, transport)?;
        api.session_state_mut().client = Some(http);
        Ok(api)
    }

    /// The controller root, without the `/api` suffix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Open the session, building an HTTP client unless one was supplied.
    ///
    /// Calling it on an open session does nothing.
    pub fn connect(&self) -> Result<(), Error> {
        let mut state = self.session_state_mut();
        if state.client.is_none() {
            debug!(base_url = %self.base_url, "opening session");
            state.client = Some(self.transport.build_client()?);
            state.owned = true;
        }
        Ok(())
    }

    /// Close the session if this instance created its client.
    ///
    /// Idempotent; an externally supplied client is never dropped.
    pub fn disconnect(&self) {
        let mut state = self.session_state_mut();
        if state.owned {
            debug!(base_url = %self.base_url, "closing session");
            state.client = None;
            state.owned = false;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client
            .is_some()
    }

    /// Open the session for the lifetime of the returned guard.
    pub fn session(&self) -> Result<Session<'_>, Error> {
        Session::open(self)
    }

    fn session_state_mut(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.session.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn http(&self) -> Result<reqwest::Client, Error> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .client
            .clone()
            .ok_or_else(|| Error::Connection {
                message: "session is not connected".into(),
                source: None,
            })
    }

    // ── Last-seen state ──────────────────────────────────────────────

    pub(crate) fn remember_status(&self, status: Option<&DeviceStatus>) {
        *self
            .last_status
            .write()
            .unwrap_or_else(PoisonError::into_inner) = status.cloned();
    }

    pub(crate) fn remember_profiles(&self, profiles: Option<&[Profile]>) {
        *self
            .last_profiles
            .write()
            .unwrap_or_else(PoisonError::into_inner) = profiles.map(<[Profile]>::to_vec);
    }

    /// The currently selected profile, from what earlier calls have seen.
    ///
    /// Prefers the last [`get_status`](Self::get_status) snapshot, which
    /// names the active profile directly. Falls back to the entry flagged
    /// `selected` in the last [`get_profiles`](Self::get_profiles) result.
    /// Returns `None` if neither has been fetched.
    pub fn current_profile(&self) -> Option<Profile> {
        let from_status = self
            .last_status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|status| Profile {
                selected: Some(true),
                ..Profile::new(status.profile_id, status.profile_name.clone())
            });

        let profile = from_status.or_else(|| {
            self.last_profiles
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .as_ref()
                .and_then(|profiles| profiles.iter().find(|p| p.is_selected()).cloned())
        });

        match &profile {
            Some(p) => debug!(id = p.id, name = %p.name, "current profile"),
            None => debug!("no selected profile known; call get_status() or get_profiles() first"),
        }
        profile
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.api_url.join(path)?)
    }

    // ── Request executor ─────────────────────────────────────────────

    /// Send one request and classify the outcome.
    ///
    /// GET sends `params` as a query string. POST and DELETE send `payload`
    /// as a JSON body when given; otherwise `params` are form-encoded into
    /// the body and the form content type is set. A 404 becomes
    /// [`Error::EndpointNotFound`]; other statuses are returned for the
    /// caller to judge.
    pub(crate) async fn execute<P: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        params: Option<&[(&str, &str)]>,
        payload: Option<&P>,
    ) -> Result<Response, Error> {
        let http = self.http()?;
        let timeout = self.transport.timeout.total();

        let mut request = http.request(method.clone(), url.clone()).timeout(timeout);
        if method == Method::GET {
            if let Some(params) = params {
                request = request.query(params);
            }
        } else if let Some(payload) = payload {
            request = request.json(payload);
        } else if let Some(params) = params {
            request = request.form(params);
        } else {
            request = request.header(CONTENT_TYPE, FORM_CONTENT_TYPE);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::from_transport(e, timeout))?;

        debug!("{method} {url} -> {}", response.status().as_u16());

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::EndpointNotFound {
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    /// GET and decode a JSON body. A `null` or empty body yields `None`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, Error> {
        let url = self.api_url(path)?;
        let timeout = self.transport.timeout.total();
        let response = self
            .execute::<()>(Method::GET, url, None, None)
            .await?
            .error_for_status()
            .map_err(|e| Error::from_transport(e, timeout))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::from_transport(e, timeout))?;
        trace!(bytes = body.len(), "response body");

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(serde_json::from_slice::<Option<T>>(&body)?)
    }

    /// Send a write and report whether the device accepted it (any 2xx).
    async fn send_for_success<P: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&P>,
    ) -> Result<bool, Error> {
        let url = self.api_url(path)?;
        let response = self.execute(method, url, None, payload).await?;
        Ok(response.status().is_success())
    }

    /// Form-encoded POST without a body.
    pub(crate) async fn post(&self, path: &str) -> Result<bool, Error> {
        self.send_for_success::<()>(Method::POST, path, None).await
    }

    /// POST with a JSON body.
    pub(crate) async fn post_json<P: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &P,
    ) -> Result<bool, Error> {
        self.send_for_success(Method::POST, path, Some(payload)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<bool, Error> {
        self.send_for_success::<()>(Method::DELETE, path, None).await
    }
}

impl std::fmt::Debug for GaggiuinoApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GaggiuinoApi")
            .field("base_url", &self.base_url.as_str())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}

/// An open session, closed again when dropped.
///
/// Dropping runs on every exit path, early returns and `?` included, so
/// a session created by [`GaggiuinoApi::session`] is never leaked.
/// Derefs to the client.
#[must_use = "the session closes as soon as the guard is dropped"]
pub struct Session<'a> {
    api: &'a GaggiuinoApi,
}

impl<'a> Session<'a> {
    pub fn open(api: &'a GaggiuinoApi) -> Result<Self, Error> {
        api.connect()?;
        Ok(Self { api })
    }
}

impl Deref for Session<'_> {
    type Target = GaggiuinoApi;

    fn deref(&self) -> &GaggiuinoApi {
        self.api
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        self.api.disconnect();
    }
}
