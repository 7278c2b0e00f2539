//! Config subcommand handlers.

use dialoguer::{Confirm, Input};

use gaggiuino_config::{self as config_file, Config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const MASK: &str = "********";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Copy of the config with plaintext tokens hidden.
fn masked(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let path = config_file::config_path();
            eprintln!("Gaggiuino CLI configuration");
            eprintln!("  Config path: {}\n", path.display());

            let mut cfg = config_file::load_config_or_default();
            let mut profile = config::default_profile();

            let name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            profile.base_url = Input::new()
                .with_prompt("Machine URL")
                .default(profile.base_url)
                .validate_with(|raw: &String| {
                    config_file::validate_base_url(raw)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let token_env: String = Input::new()
                .with_prompt("Environment variable holding a bearer token (blank for none)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;
            if !token_env.trim().is_empty() {
                profile.token_env = Some(token_env.trim().to_owned());
            }

            let make_default = cfg.profiles.is_empty()
                || Confirm::new()
                    .with_prompt(format!("Make '{name}' the default profile?"))
                    .default(true)
                    .interact()
                    .map_err(prompt_err)?;
            if make_default {
                cfg.default_profile = Some(name.clone());
            }

            cfg.profiles.insert(name.clone(), profile);
            let written = config_file::save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", written.display());
            eprintln!("  Profile: {name}");
            eprintln!("\n  Test it: gaggiuino -p {name} health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = masked(&config_file::load_config()?);
            let format = global.format();
            let out = if format == OutputFormat::Table {
                toml::to_string_pretty(&cfg).map_err(|e| CliError::Config(e.into()))?
            } else {
                output::render_single(&format, &cfg, |_| String::new(), |c| {
                    let mut names: Vec<&str> = c.profiles.keys().map(String::as_str).collect();
                    names.sort_unstable();
                    names.join("\n")
                })
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&config_file::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
