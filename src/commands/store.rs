//! Store command handler

use anyhow::Result;
use serde_json::json;

use super::{CommandContext, Outcome};

pub fn cmd_store(ctx: &CommandContext) -> Result<Outcome> {
    let assemblies = ctx.host.stored_assemblies()?;
    ctx.emit(
        "store",
        &json!({
            "probing": ctx.host.probing_root().display().to_string(),
            "assemblies": assemblies,
        }),
        |r| r.render_store(&assemblies),
    );
    Ok(Outcome::Success)
}
