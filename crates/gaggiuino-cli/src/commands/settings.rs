//! Settings handlers.
//!
//! Reads go through the typed records and are shown in wire form, so
//! `show -o json` output can be edited and fed back with `update --from-file`.

use serde_json::{Map, Value};

use gaggiuino_api::models::{
    BoilerSettings, DisplaySettings, LedSettings, ScalesSettings, SystemSettings, ThemeSettings,
    Versions,
};
use gaggiuino_api::{GaggiuinoApi, SettingsCategory, SettingsRecord, WritableSettings};

use crate::cli::{GlobalOpts, SettingsArgs, SettingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

type WireMap = Map<String, Value>;

async fn fetch<S: SettingsRecord>(api: &GaggiuinoApi) -> Result<Option<WireMap>, CliError> {
    let record = api.get_category::<S>().await?;
    Ok(record.map(|s| s.to_wire()).transpose()?)
}

async fn fetch_category(
    api: &GaggiuinoApi,
    category: SettingsCategory,
) -> Result<Option<WireMap>, CliError> {
    match category {
        SettingsCategory::Boiler => fetch::<BoilerSettings>(api).await,
        SettingsCategory::System => fetch::<SystemSettings>(api).await,
        SettingsCategory::Led => fetch::<LedSettings>(api).await,
        SettingsCategory::Scales => fetch::<ScalesSettings>(api).await,
        SettingsCategory::Display => fetch::<DisplaySettings>(api).await,
        SettingsCategory::Theme => fetch::<ThemeSettings>(api).await,
        SettingsCategory::Versions => fetch::<Versions>(api).await,
    }
}

/// Decode the body as `S` first so a malformed file never reaches the
/// machine, then send the file's JSON unchanged.
async fn replace<S: WritableSettings>(api: &GaggiuinoApi, body: &WireMap) -> Result<bool, CliError> {
    S::from_wire(Value::Object(body.clone())).map_err(|e| CliError::Validation {
        field: S::CATEGORY.to_string(),
        reason: e.to_string(),
    })?;
    Ok(api.update_category_raw::<S>(body).await?)
}

async fn replace_category(
    api: &GaggiuinoApi,
    category: SettingsCategory,
    body: &WireMap,
) -> Result<bool, CliError> {
    match category {
        SettingsCategory::Boiler => replace::<BoilerSettings>(api, body).await,
        SettingsCategory::System => replace::<SystemSettings>(api, body).await,
        SettingsCategory::Led => replace::<LedSettings>(api, body).await,
        SettingsCategory::Scales => replace::<ScalesSettings>(api, body).await,
        SettingsCategory::Display => replace::<DisplaySettings>(api, body).await,
        SettingsCategory::Theme => replace::<ThemeSettings>(api, body).await,
        SettingsCategory::Versions => Err(read_only(category)),
    }
}

fn read_only(category: SettingsCategory) -> CliError {
    CliError::Validation {
        field: "category".into(),
        reason: format!("{category} settings are read-only"),
    }
}

fn missing(category: &str) -> CliError {
    CliError::NotFound {
        resource_type: "settings".into(),
        identifier: category.into(),
        list_command: "settings show".into(),
    }
}

/// One `[category]` block per entry.
fn sections(all: &WireMap) -> String {
    all.iter()
        .map(|(name, body)| match body {
            Value::Object(map) => format!("[{name}]\n{}", output::detail_map(map)),
            other => format!("[{name}]\n{other}"),
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub async fn handle(
    api: &GaggiuinoApi,
    args: SettingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SettingsCommand::Show { category: None } => {
            let settings = api.get_settings().await?.ok_or_else(|| missing("all"))?;
            let wire = match serde_json::to_value(&settings)? {
                Value::Object(map) => map,
                _ => WireMap::new(),
            };
            let out = output::render_single(&global.format(), &wire, sections, |m| {
                m.keys().cloned().collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Show {
            category: Some(category),
        } => {
            let wire = fetch_category(api, category)
                .await?
                .ok_or_else(|| missing(category.into()))?;
            let out = output::render_single(&global.format(), &wire, output::detail_map, |m| {
                m.iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SettingsCommand::Update {
            category,
            from_file,
        } => {
            if !category.is_writable() {
                return Err(read_only(category));
            }
            let body = util::read_json_object(&from_file)?;
            let accepted = replace_category(api, category, &body).await?;
            util::ensure_accepted(accepted, &format!("update {category} settings"))?;
            if !global.quiet {
                eprintln!("Updated {category} settings");
            }
            Ok(())
        }

        SettingsCommand::SetSteam { celsius } => {
            let mut boiler = api
                .get_boiler_settings()
                .await?
                .ok_or_else(|| missing("boiler"))?;
            tracing::debug!(from = boiler.steam_set_point, to = celsius, "changing steam set point");
            boiler.steam_set_point = celsius;
            let accepted = api.update_boiler_settings(&boiler).await?;
            util::ensure_accepted(accepted, "update boiler settings")?;
            if !global.quiet {
                eprintln!("Steam set point is now {celsius} °C");
            }
            Ok(())
        }
    }
}
