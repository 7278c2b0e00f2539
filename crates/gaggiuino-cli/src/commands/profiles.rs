//! Profile command handlers.

use tabled::Tabled;

use gaggiuino_api::{GaggiuinoApi, Profile};

use crate::cli::{GlobalOpts, ProfilesArgs, ProfilesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    selected: String,
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Phases")]
    phases: usize,
    #[tabled(rename = "Water °C")]
    water: String,
}

fn row(p: &Profile, color: bool) -> ProfileRow {
    ProfileRow {
        selected: output::marker(p.is_selected(), color),
        id: p.id,
        name: p.name.clone(),
        phases: p.phases.as_ref().map_or(0, Vec::len),
        water: p
            .water_temperature
            .map_or_else(|| "-".into(), |t| t.to_string()),
    }
}

fn detail(p: &Profile) -> String {
    let mut pairs = vec![
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Selected", String::from(if p.is_selected() { "yes" } else { "no" })),
        (
            "Water",
            p.water_temperature
                .map_or_else(|| "-".into(), |t| format!("{t} °C")),
        ),
        ("Phases", p.phases.as_ref().map_or(0, Vec::len).to_string()),
    ];
    if let Some(ref stop) = p.global_stop_conditions {
        pairs.push(("Stop when", serde_json::Value::Object(stop.clone()).to_string()));
    }
    output::detail(&pairs)
}

fn not_found(identifier: String) -> CliError {
    CliError::NotFound {
        resource_type: "profile".into(),
        identifier,
        list_command: "profiles list".into(),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    api: &GaggiuinoApi,
    args: ProfilesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ProfilesCommand::List => {
            let profiles = api.get_profiles().await?.unwrap_or_default();
            let color = output::should_color(&global.color);
            let out = output::render_list(
                &global.format(),
                &profiles,
                |p| row(p, color),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Current => {
            // Populate the list so the selected flag can answer when no
            // status snapshot is around yet.
            api.get_profiles().await?;
            let profile = api
                .current_profile()
                .ok_or_else(|| not_found("selected".into()))?;
            let out = output::render_single(&global.format(), &profile, detail, |p| {
                p.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProfilesCommand::Select { id } => {
            let accepted = api.select_profile(id).await?;
            util::ensure_accepted(accepted, &format!("select profile {id}"))?;
            if !global.quiet {
                eprintln!("Profile {id} selected");
            }
            Ok(())
        }

        ProfilesCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete profile {id}? This cannot be undone."),
                "profiles delete",
                global.yes,
            )? {
                return Ok(());
            }
            let accepted = api.delete_profile(id).await?;
            util::ensure_accepted(accepted, &format!("delete profile {id}"))?;
            if !global.quiet {
                eprintln!("Profile {id} deleted");
            }
            Ok(())
        }
    }
}
