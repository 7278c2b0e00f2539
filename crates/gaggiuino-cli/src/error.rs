//! CLI error types with miette diagnostics.
//!
//! Maps library and config errors into user-facing errors with help text
//! and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use gaggiuino_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the machine")]
    #[diagnostic(
        code(gaggiuino::connection_failed),
        help(
            "Check that the machine is powered on and on the same network.\n\
             Set the address with --url or base_url in your profile."
        )
    )]
    ConnectionFailed {
        #[source]
        source: gaggiuino_api::Error,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(gaggiuino::timeout),
        help("Increase the timeout with --timeout or check the machine's Wi-Fi signal.")
    )]
    Timeout {
        seconds: f64,
        #[source]
        source: gaggiuino_api::Error,
    },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Endpoint not found: {url}")]
    #[diagnostic(
        code(gaggiuino::endpoint_not_found),
        help("The firmware may be too old for this command. Check `gaggiuino settings show versions`.")
    )]
    EndpointNotFound { url: String },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(gaggiuino::not_found),
        help("Run: gaggiuino {list_command}")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Device ───────────────────────────────────────────────────────

    #[error("The machine rejected the request: {action}")]
    #[diagnostic(code(gaggiuino::rejected))]
    Rejected { action: String },

    #[error("The machine reports status '{status}'")]
    #[diagnostic(code(gaggiuino::unhealthy))]
    Unhealthy { status: String },

    #[error(transparent)]
    #[diagnostic(code(gaggiuino::api))]
    Api(gaggiuino_api::Error),

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gaggiuino::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gaggiuino::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gaggiuino config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(gaggiuino::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(gaggiuino::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(gaggiuino::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::EndpointNotFound { .. } | Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Library error → CliError mapping ────────────────────────────────

impl From<gaggiuino_api::Error> for CliError {
    fn from(err: gaggiuino_api::Error) -> Self {
        match err {
            gaggiuino_api::Error::Timeout { timeout, .. } => CliError::Timeout {
                seconds: timeout.as_secs_f64(),
                source: err,
            },
            gaggiuino_api::Error::Connection { .. } => CliError::ConnectionFailed { source: err },
            gaggiuino_api::Error::EndpointNotFound { url } => CliError::EndpointNotFound { url },
            gaggiuino_api::Error::Unhandled { .. } => CliError::Api(err),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            other => CliError::Config(other),
        }
    }
}
