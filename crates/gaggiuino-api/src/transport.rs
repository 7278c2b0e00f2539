// Transport configuration for building the reqwest::Client a session owns.
//
// Timeouts may be given as plain seconds, a `Duration`, or a structured
// descriptor; all of them collapse into one `RequestTimeout` that is applied
// to the client and to every request.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// Request deadline used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const USER_AGENT: &str = concat!("gaggiuino-api/", env!("CARGO_PKG_VERSION"));

/// Structured timeout, for callers that want to set the connect phase apart.
///
/// A descriptor without `total` falls back to [`DEFAULT_TIMEOUT`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeoutDescriptor {
    pub total: Option<Duration>,
    pub connect: Option<Duration>,
}

/// The canonical per-request timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTimeout {
    total: Duration,
    connect: Option<Duration>,
}

impl RequestTimeout {
    pub fn new(total: Duration) -> Self {
        Self {
            total,
            connect: None,
        }
    }

    /// Deadline for the whole exchange.
    pub fn total(&self) -> Duration {
        self.total
    }

    /// Deadline for establishing the connection, if set separately.
    pub fn connect(&self) -> Option<Duration> {
        self.connect
    }
}

impl Default for RequestTimeout {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl From<Duration> for RequestTimeout {
    fn from(total: Duration) -> Self {
        Self::new(total)
    }
}

impl From<u64> for RequestTimeout {
    fn from(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

/// Negative, NaN or overflowing values fall back to [`DEFAULT_TIMEOUT`].
impl From<f64> for RequestTimeout {
    fn from(secs: f64) -> Self {
        Duration::try_from_secs_f64(secs).map_or_else(|_| Self::default(), Self::new)
    }
}

impl From<TimeoutDescriptor> for RequestTimeout {
    fn from(desc: TimeoutDescriptor) -> Self {
        Self {
            total: desc.total.unwrap_or(DEFAULT_TIMEOUT),
            connect: desc.connect,
        }
    }
}

/// Settings for the HTTP client a session creates for itself.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: RequestTimeout,
    /// Static bearer token, for firmware builds behind a reverse proxy.
    pub token: Option<SecretString>,
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: RequestTimeout::default(),
            token: None,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

impl TransportConfig {
    pub fn with_timeout(mut self, timeout: impl Into<RequestTimeout>) -> Self {
        self.timeout = timeout.into();
        self
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(Error::unhandled)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout.total())
            .user_agent(self.user_agent.as_str())
            .default_headers(headers);

        if let Some(connect) = self.timeout.connect() {
            builder = builder.connect_timeout(connect);
        }

        builder.build().map_err(Error::unhandled)
    }
}
