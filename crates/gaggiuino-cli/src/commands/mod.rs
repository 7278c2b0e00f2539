//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod firmware;
pub mod profiles;
pub mod settings;
pub mod shots;
pub mod status;
pub mod system;
pub mod util;

use gaggiuino_api::GaggiuinoApi;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a machine-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, api: &GaggiuinoApi, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(api, global).await,
        Command::Profiles(args) => profiles::handle(api, args, global).await,
        Command::Shots(args) => shots::handle(api, args, global).await,
        Command::Settings(args) => settings::handle(api, args, global).await,
        Command::Firmware(args) => firmware::handle(api, args, global).await,
        Command::Health => system::health(api, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
