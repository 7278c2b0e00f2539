//! Firmware handlers.

use gaggiuino_api::{FirmwareState, GaggiuinoApi};

use crate::cli::{FirmwareArgs, FirmwareCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    api: &GaggiuinoApi,
    args: FirmwareArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        FirmwareCommand::Update { version } => {
            let target = version.as_deref().unwrap_or("latest");
            if !util::confirm(
                &format!("Update firmware to {target}? The machine will restart."),
                "firmware update",
                global.yes,
            )? {
                return Ok(());
            }
            let accepted = api.update_firmware(version.as_deref()).await?;
            util::ensure_accepted(accepted, "firmware update")?;
            if !global.quiet {
                eprintln!("Firmware update to {target} started. Follow it with: gaggiuino firmware progress");
            }
            Ok(())
        }

        FirmwareCommand::Progress => {
            let progress = api
                .get_firmware_progress()
                .await?
                .ok_or_else(|| CliError::NotFound {
                    resource_type: "firmware progress".into(),
                    identifier: "firmware/progress".into(),
                    list_command: "health".into(),
                })?;
            let state = FirmwareState::of(&progress);
            if state.as_ref().is_some_and(FirmwareState::is_in_progress) {
                tracing::info!("firmware update in progress");
            }
            let out = output::render_single(&global.format(), &progress, output::detail_map, |_| {
                state
                    .as_ref()
                    .map_or_else(|| "unknown".into(), ToString::to_string)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
