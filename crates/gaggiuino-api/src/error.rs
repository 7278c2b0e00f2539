use std::any::type_name;
use std::time::Duration;

use thiserror::Error;

/// Boxed low-level cause carried by every error kind.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for the `gaggiuino-api` crate.
///
/// A closed set: callers only ever need to match these four kinds. The
/// transport's own error types stay behind `source()` for diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Connectivity ────────────────────────────────────────────────
    /// The machine could not be reached, or the connection dropped mid-request.
    #[error("Connection failed: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// No response arrived within the configured deadline.
    ///
    /// A specialisation of [`Connection`](Self::Connection):
    /// [`is_connection`](Self::is_connection) is `true` for both.
    #[error("Connection timed out after {}s", .timeout.as_secs_f64())]
    Timeout {
        timeout: Duration,
        #[source]
        source: Option<BoxError>,
    },

    // ── HTTP ────────────────────────────────────────────────────────
    /// The device answered 404 for the requested path.
    #[error("Endpoint not found: {url}")]
    EndpointNotFound { url: String },

    // ── Catch-all ───────────────────────────────────────────────────
    /// Anything else: decoding failures, malformed URLs, client build errors.
    ///
    /// `kind` is the Rust type name of the original error.
    #[error("Unhandled exception: {kind}: {message}")]
    Unhandled {
        kind: &'static str,
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    /// Wrap an arbitrary error, preserving its type name and message.
    pub fn unhandled<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unhandled {
            kind: type_name::<E>(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Classify a transport error from `reqwest`.
    ///
    /// Timeouts win over connect failures: a connect that times out is
    /// reported as [`Timeout`](Self::Timeout).
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                timeout,
                source: Some(Box::new(err)),
            }
        } else if err.is_connect() || err.is_request() {
            Self::Connection {
                message: err.to_string(),
                source: Some(Box::new(err)),
            }
        } else {
            Self::unhandled(err)
        }
    }

    /// Returns `true` for any connectivity problem, timeouts included.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if the request deadline elapsed.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the device answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::EndpointNotFound { .. })
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::unhandled(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::unhandled(err)
    }
}
