//! Load command handler
//!
//! Rebuilds, then maps every selected module into this process. Useful to
//! check that the stored binaries load and to list what they export.

use anyhow::Result;
use serde_json::json;

use modhost::presentation::LoadReportView;

use super::{CommandContext, Outcome};

pub fn cmd_load(ctx: &CommandContext) -> Result<Outcome> {
    let modules = ctx.host.discover()?;
    let use_case = ctx.host.rebuild_use_case();
    let (plan, commit) = use_case.rebuild(&modules)?;
    if commit.restart_required {
        ctx.emit("load", &json!({ "commit": commit }), |r| r.render_commit(&commit));
        return Ok(Outcome::RestartRequired);
    }

    let report = use_case.load(&plan.selections)?;
    ctx.emit(
        "load",
        &json!({ "commit": commit, "load": LoadReportView::from(&report) }),
        |r| format!("{}{}", r.render_commit(&commit), r.render_load(&report)),
    );
    Ok(Outcome::Success)
}
