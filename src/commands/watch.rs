//! Watch command handler

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use modhost::presentation::OutputFormat;
use modhost::WatchOutcome;

use super::{CommandContext, Outcome};

pub fn cmd_watch(ctx: &CommandContext, no_load: bool) -> Result<Outcome> {
    let options = ctx
        .host
        .config()
        .watch_options()
        .with_load_extensions(!no_load);
    let use_case = ctx.host.watch_use_case(options);

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("Error setting Ctrl+C handler")?;

    let json = ctx.format == OutputFormat::Json;
    let renderer = ctx.renderer;
    let outcome = use_case.start(running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            println!("{}", renderer.render_watch_event(&event));
        }
    })?;

    Ok(match outcome {
        WatchOutcome::Stopped => Outcome::Success,
        WatchOutcome::RestartRequired { .. } => Outcome::RestartRequired,
    })
}
