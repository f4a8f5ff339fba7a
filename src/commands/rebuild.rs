//! Rebuild command handler

use anyhow::Result;
use serde_json::json;

use super::{CommandContext, Outcome};

pub fn cmd_rebuild(ctx: &CommandContext, dry_run: bool) -> Result<Outcome> {
    let modules = ctx.host.discover()?;
    let use_case = ctx.host.rebuild_use_case();
    let plan = use_case.plan(&modules)?;

    if dry_run {
        ctx.emit("rebuild", &json!({ "dry_run": true, "plan": plan }), |r| {
            r.render_plan(&plan)
        });
        return Ok(Outcome::Success);
    }

    let report = use_case.commit(&plan)?;
    ctx.emit(
        "rebuild",
        &json!({ "dry_run": false, "plan": plan, "commit": report }),
        |r| format!("{}{}", r.render_plan(&plan), r.render_commit(&report)),
    );
    Ok(Outcome::from_restart(report.restart_required))
}
