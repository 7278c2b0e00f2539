//! Target resolution: config file profile plus CLI flag overrides.
//!
//! Flags win over the profile, the profile wins over built-in defaults.

use secrecy::SecretString;

use gaggiuino_api::{DEFAULT_BASE_URL, TransportConfig};
use gaggiuino_config::{Config, Profile};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything needed to talk to one machine.
#[derive(Debug)]
pub struct Target {
    pub base_url: String,
    pub transport: TransportConfig,
}

/// Resolve the machine to talk to.
///
/// A profile named with `--profile` must exist. Without one, the config's
/// `default_profile` is used when present, else the built-in defaults.
pub fn resolve_target(global: &GlobalOpts, cfg: &Config) -> Result<Target, CliError> {
    let mut profile = match global.profile.as_deref() {
        Some(name) => {
            let (_, profile) = cfg
                .profile(Some(name))
                .ok_or_else(|| profile_not_found(name, cfg))?;
            profile.clone()
        }
        None => cfg
            .profile(None)
            .map(|(_, profile)| profile.clone())
            .unwrap_or_default(),
    };

    if let Some(ref url) = global.url {
        profile.base_url.clone_from(url);
    }
    if global.timeout.is_some() {
        profile.timeout = global.timeout;
    }

    let mut transport = gaggiuino_config::profile_to_transport(&profile, &cfg.defaults)?;
    if let Some(ref token) = global.token {
        transport.token = Some(SecretString::from(token.clone()));
    }

    tracing::debug!(
        base_url = %profile.base_url,
        timeout = ?transport.timeout.total(),
        "resolved target"
    );
    Ok(Target {
        base_url: profile.base_url,
        transport,
    })
}

/// Fill `--output` from `defaults.output` when the flag is absent.
///
/// An unrecognised config value falls back to table.
pub fn apply_output_default(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_some() {
        return;
    }
    let parsed = <OutputFormat as clap::ValueEnum>::from_str(&cfg.defaults.output, true);
    if parsed.is_err() {
        tracing::warn!(output = %cfg.defaults.output, "unknown output format in config");
    }
    global.output = Some(parsed.unwrap_or(OutputFormat::Table));
}

fn profile_not_found(name: &str, cfg: &Config) -> CliError {
    let mut names: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    names.sort_unstable();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if names.is_empty() {
            "(none)".into()
        } else {
            names.join(", ")
        },
    }
}

/// A profile pointing at the stock address, used by `config init`.
pub fn default_profile() -> Profile {
    Profile {
        base_url: DEFAULT_BASE_URL.into(),
        ..Profile::default()
    }
}
