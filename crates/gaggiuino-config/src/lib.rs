//! Shared configuration for Gaggiuino tools.
//!
//! TOML profiles (one per machine), token resolution (env + plaintext),
//! and translation into `gaggiuino_api::TransportConfig`. The CLI layers
//! its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use gaggiuino_api::{DEFAULT_BASE_URL, RequestTimeout, TransportConfig};

/// Prefix for environment overrides, e.g. `GAGGIUINO_DEFAULTS__TIMEOUT=10`.
pub const ENV_PREFIX: &str = "GAGGIUINO_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
///
/// ```toml
/// default_profile = "kitchen"
///
/// [defaults]
/// output = "table"
/// timeout = 5.0
///
/// [profiles.kitchen]
/// base_url = "http://gaggiuino.local"
/// token_env = "GAGGIUINO_KITCHEN_TOKEN"
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named machine profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile by name, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Option<(&str, &Profile)> {
        let name = name.or(self.default_profile.as_deref())?;
        self.profiles
            .get_key_value(name)
            .map(|(name, profile)| (name.as_str(), profile))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Seconds.
    #[serde(default = "default_timeout")]
    pub timeout: f64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> f64 {
    gaggiuino_api::DEFAULT_TIMEOUT.as_secs_f64()
}

/// One machine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Profile {
    /// Controller root, e.g. `http://192.168.1.50`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Override the default timeout, in seconds.
    pub timeout: Option<f64>,

    /// Bearer token (plaintext; prefer `token_env`).
    pub token: Option<String>,

    /// Environment variable holding the bearer token.
    pub token_env: Option<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: None,
            token: None,
            token_env: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("dev", "gaggiuino", "gaggiuino").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("gaggiuino");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then overlay `GAGGIUINO_*` variables.
///
/// A missing file is not an error: defaults and env still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Profile resolution ──────────────────────────────────────────────

/// Resolve a profile's bearer token: `token_env` first, then `token`.
///
/// Tokens are optional; a stock controller needs none.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Some(SecretString::from(val));
        }
    }
    profile.token.clone().map(SecretString::from)
}

/// Check that a timeout is usable: finite and above zero.
pub fn validate_timeout(secs: f64) -> Result<f64, ConfigError> {
    if secs.is_finite() && secs > 0.0 {
        Ok(secs)
    } else {
        Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: format!("expected a positive number of seconds, got {secs}"),
        })
    }
}

/// Check that a base URL parses and uses http(s).
pub fn validate_base_url(raw: &str) -> Result<url::Url, ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("expected http or https, got '{other}'"),
        }),
    }
}

/// Build a `TransportConfig` from a profile, no CLI flag overrides.
pub fn profile_to_transport(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<TransportConfig, ConfigError> {
    validate_base_url(&profile.base_url)?;
    let secs = validate_timeout(profile.timeout.unwrap_or(defaults.timeout))?;

    let mut transport = TransportConfig::default().with_timeout(RequestTimeout::from(secs));
    transport.token = resolve_token(profile);
    Ok(transport)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    const SAMPLE: &str = r#"
default_profile = "kitchen"

[defaults]
output = "json"
timeout = 3.0

[profiles.kitchen]
base_url = "http://192.168.1.50"
token = "plain"

[profiles.garage]
base_url = "http://garage.lan:8080/"
timeout = 12.5
"#;

    #[test]
    fn loads_profiles_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();

        let cfg = load_config_from(&path).unwrap();

        assert_eq!(cfg.default_profile.as_deref(), Some("kitchen"));
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.profiles.len(), 2);

        let (name, garage) = cfg.profile(Some("garage")).unwrap();
        assert_eq!(name, "garage");
        assert_eq!(garage.timeout, Some(12.5));

        let (name, _) = cfg.profile(None).unwrap();
        assert_eq!(name, "kitchen");
        assert!(cfg.profile(Some("missing")).is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert!((cfg.defaults.timeout - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                token_env: Some("MY_TOKEN".into()),
                ..Profile::default()
            },
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("GAGGIUINO_DEFAULTS__TIMEOUT", "9");
            jail.set_env("GAGGIUINO_PROFILES__KITCHEN__BASE_URL", "http://10.0.0.2");

            let cfg = load_config_from(Path::new("config.toml")).map_err(|e| e.to_string())?;
            assert!((cfg.defaults.timeout - 9.0).abs() < f64::EPSILON);
            assert_eq!(cfg.profiles["kitchen"].base_url, "http://10.0.0.2");
            assert_eq!(cfg.profiles["kitchen"].token.as_deref(), Some("plain"));
            Ok(())
        });
    }

    #[test]
    fn token_env_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("KITCHEN_TOKEN", "from-env");
            let profile = Profile {
                token: Some("plain".into()),
                token_env: Some("KITCHEN_TOKEN".into()),
                ..Profile::default()
            };
            let token = resolve_token(&profile).unwrap();
            assert_eq!(token.expose_secret(), "from-env");

            let unset = Profile {
                token: Some("plain".into()),
                token_env: Some("GAGGIUINO_TEST_UNSET_TOKEN".into()),
                ..Profile::default()
            };
            assert_eq!(resolve_token(&unset).unwrap().expose_secret(), "plain");
            Ok(())
        });
    }

    #[test]
    fn profile_becomes_transport() {
        let profile = Profile {
            timeout: Some(2.5),
            ..Profile::default()
        };
        let transport = profile_to_transport(&profile, &Defaults::default()).unwrap();
        assert_eq!(transport.timeout.total(), Duration::from_millis(2500));
        assert!(transport.token.is_none());

        let inherited = profile_to_transport(&Profile::default(), &Defaults::default()).unwrap();
        assert_eq!(inherited.timeout.total(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        let bad_url = Profile {
            base_url: "gaggiuino.local".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_transport(&bad_url, &Defaults::default()),
            Err(ConfigError::Validation { field, .. }) if field == "base_url"
        ));

        let ftp = validate_base_url("ftp://gaggiuino.local").unwrap_err();
        assert!(ftp.to_string().contains("http or https"));

        let zero = Profile {
            timeout: Some(0.0),
            ..Profile::default()
        };
        assert!(matches!(
            profile_to_transport(&zero, &Defaults::default()),
            Err(ConfigError::Validation { field, .. }) if field == "timeout"
        ));
    }
}
