//! Shot history handlers.

use gaggiuino_api::{GaggiuinoApi, LatestShotResult, Shot};

use crate::cli::{GlobalOpts, ShotsArgs, ShotsCommand};
use crate::error::CliError;
use crate::output;

fn detail(s: &Shot) -> String {
    let profile = s
        .profile_snapshot()
        .map_or_else(|_| "-".into(), |p| format!("{} (#{})", p.name, p.id));
    output::detail(&[
        ("ID", s.id.to_string()),
        (
            "Recorded",
            s.recorded_at()
                .map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string()),
        ),
        ("Duration", format!("{:.1}s", f64::from(s.duration) / 10.0)),
        ("Profile", profile),
        ("Samples", s.datapoints.len().to_string()),
    ])
}

fn not_found(id: u32) -> CliError {
    CliError::NotFound {
        resource_type: "shot".into(),
        identifier: id.to_string(),
        list_command: "shots latest".into(),
    }
}

async fn show(api: &GaggiuinoApi, id: u32, global: &GlobalOpts) -> Result<(), CliError> {
    let shot = api.get_shot(id).await?.ok_or_else(|| not_found(id))?;
    let out = output::render_single(&global.format(), &shot, detail, |s| s.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn latest(api: &GaggiuinoApi) -> Result<LatestShotResult, CliError> {
    api.get_latest_shot_id()
        .await?
        .ok_or_else(|| CliError::NotFound {
            resource_type: "shot".into(),
            identifier: "latest".into(),
            list_command: "shots latest".into(),
        })
}

pub async fn handle(api: &GaggiuinoApi, args: ShotsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ShotsCommand::Latest => {
            let pointer = latest(api).await?;
            let id = |p: &LatestShotResult| p.last_shot_id.to_string();
            let out = output::render_single(&global.format(), &pointer, id, id);
            output::print_output(&out, global.quiet);
            Ok(())
        }
        ShotsCommand::Get { id } => show(api, id, global).await,
        ShotsCommand::ShowLatest => {
            let pointer = latest(api).await?;
            show(api, pointer.last_shot_id, global).await
        }
    }
}
