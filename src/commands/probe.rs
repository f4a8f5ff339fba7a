//! Probe command handler
//!
//! Shows every loader claim without deciding anything.

use anyhow::Result;
use serde_json::json;

use super::{CommandContext, Outcome};

pub fn cmd_probe(ctx: &CommandContext) -> Result<Outcome> {
    let reports = ctx.host.probe()?;
    ctx.emit("probe", &json!({ "modules": reports }), |r| {
        r.render_probe(&reports)
    });
    Ok(Outcome::Success)
}
