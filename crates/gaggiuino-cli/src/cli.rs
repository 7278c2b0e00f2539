//! Clap derive structures for the `gaggiuino` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gaggiuino_api::SettingsCategory;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// gaggiuino -- command-line control for Gaggiuino espresso machines
#[derive(Debug, Parser)]
#[command(
    name = "gaggiuino",
    version,
    about = "Control a Gaggiuino espresso machine from the command line",
    long_about = "Read live status, manage brew profiles, browse shot history,\n\
        and tune device settings over the Gaggiuino REST API.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Machine profile to use
    #[arg(long, short = 'p', env = "GAGGIUINO_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Machine base URL (overrides profile)
    #[arg(long, short = 'u', env = "GAGGIUINO_URL", global = true)]
    pub url: Option<String>,

    /// Bearer token (overrides profile)
    #[arg(long, env = "GAGGIUINO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "GAGGIUINO_TIMEOUT", global = true)]
    pub timeout: Option<f64>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "GAGGIUINO_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

impl GlobalOpts {
    /// The output format after config defaults have been applied.
    pub fn format(&self) -> OutputFormat {
        self.output.clone().unwrap_or(OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show live machine status
    #[command(alias = "st")]
    Status,

    /// Manage brew profiles
    #[command(alias = "prof", alias = "p")]
    Profiles(ProfilesArgs),

    /// Browse shot history
    Shots(ShotsArgs),

    /// View and change device settings
    #[command(alias = "set")]
    Settings(SettingsArgs),

    /// Update firmware and watch progress
    #[command(alias = "fw")]
    Firmware(FirmwareArgs),

    /// Check that the machine is responding
    Health,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Profiles ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ProfilesArgs {
    #[command(subcommand)]
    pub command: ProfilesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProfilesCommand {
    /// List all profiles
    #[command(alias = "ls")]
    List,

    /// Show the selected profile
    Current,

    /// Make a profile the active one
    Select {
        /// Profile ID
        id: u32,
    },

    /// Delete a profile from the machine
    #[command(alias = "rm")]
    Delete {
        /// Profile ID
        id: u32,
    },
}

// ── Shots ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ShotsArgs {
    #[command(subcommand)]
    pub command: ShotsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShotsCommand {
    /// Print the ID of the most recent shot
    Latest,

    /// Show one shot
    Get {
        /// Shot ID
        id: u32,
    },

    /// Show the most recent shot
    ShowLatest,
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub command: SettingsCommand,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Show all settings, or one category
    Show {
        /// boiler, system, led, scales, display, theme, versions
        #[arg(value_parser = parse_category)]
        category: Option<SettingsCategory>,
    },

    /// Replace a category from a JSON file
    Update {
        #[arg(value_parser = parse_category)]
        category: SettingsCategory,

        /// JSON object with the full category
        #[arg(long, short = 'f')]
        from_file: PathBuf,
    },

    /// Change the steam set point
    SetSteam {
        /// Target in °C
        celsius: i32,
    },
}

fn parse_category(raw: &str) -> Result<SettingsCategory, String> {
    raw.parse().map_err(|_| {
        format!("unknown category '{raw}' (expected boiler, system, led, scales, display, theme, versions)")
    })
}

// ── Firmware ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FirmwareArgs {
    #[command(subcommand)]
    pub command: FirmwareCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirmwareCommand {
    /// Update every firmware component
    #[command(disable_version_flag = true)]
    Update {
        /// Release to install [default: latest]
        #[arg(long)]
        version: Option<String>,
    },

    /// Show update progress
    Progress,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive setup wizard
    Init,

    /// Show the effective configuration (tokens masked)
    Show,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
