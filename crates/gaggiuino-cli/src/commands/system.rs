//! Health check handler.

use serde_json::Value;

use gaggiuino_api::GaggiuinoApi;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Print the health object; fail unless the machine says `ok`.
pub async fn health(api: &GaggiuinoApi, global: &GlobalOpts) -> Result<(), CliError> {
    let health = api.get_health().await?.unwrap_or_default();
    let status = health
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_owned();

    let out = output::render_single(&global.format(), &health, output::detail_map, |_| {
        status.clone()
    });
    output::print_output(&out, global.quiet);

    if status == "ok" {
        Ok(())
    } else {
        Err(CliError::Unhealthy { status })
    }
}
