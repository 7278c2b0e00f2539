//! Live status handler.

use gaggiuino_api::{DeviceStatus, GaggiuinoApi};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(api: &GaggiuinoApi, global: &GlobalOpts) -> Result<(), CliError> {
    let status = api.get_status().await?.ok_or_else(|| CliError::NotFound {
        resource_type: "status".into(),
        identifier: "system/status".into(),
        list_command: "health".into(),
    })?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.format(),
        &status,
        |s| detail(s, color),
        |s| s.profile_id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(s: &DeviceStatus, color: bool) -> String {
    output::detail(&[
        ("Profile", format!("{} (#{})", s.profile_name, s.profile_id)),
        ("Temperature", format!("{:.1} °C", s.temperature)),
        ("Target", format!("{:.1} °C", s.target_temperature)),
        ("Pressure", format!("{:.2} bar", s.pressure)),
        ("Weight", format!("{:.1} g", s.weight)),
        ("Water", format!("{}%", s.water_level)),
        ("Brew", output::switch(s.brew_switch_state, color)),
        ("Steam", output::switch(s.steam_switch_state, color)),
        ("Uptime", uptime(s.up_time)),
    ])
}

fn uptime(secs: u64) -> String {
    let (days, rest) = (secs / 86_400, secs % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let minutes = rest / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {}s", rest % 60)
    }
}
