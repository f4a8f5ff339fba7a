//! modhost CLI - extension probing, caching and hot-swap coordination
//!
//! Usage: modhost <COMMAND>
//!
//! Commands:
//!   probe    Show which loader claims each module
//!   rebuild  Plan and commit a rebuild of the probing folder
//!   load     Rebuild, then map every selected module
//!   store    List the probing folder
//!   watch    Rebuild whenever a module changes
//!
//! Exit codes: 0 success, 1 error, 3 the host must restart.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use commands::{CommandContext, Outcome};

/// Overrides the `-v` derived filter, e.g. `MODHOST_LOG=modhost=trace`
const LOG_ENV_VAR: &str = "MODHOST_LOG";

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = CommandContext::open(cli.config.as_deref(), cli.json)?;
    let outcome = match cli.command {
        Commands::Probe => commands::probe::cmd_probe(&ctx)?,
        Commands::Rebuild { dry_run } => commands::rebuild::cmd_rebuild(&ctx, dry_run)?,
        Commands::Load => commands::load::cmd_load(&ctx)?,
        Commands::Store => commands::store::cmd_store(&ctx)?,
        Commands::Watch { no_load } => commands::watch::cmd_watch(&ctx, no_load)?,
    };

    if outcome == Outcome::RestartRequired {
        std::process::exit(outcome.exit_code());
    }
    Ok(())
}

/// Initialize tracing on stderr; stdout carries command output
fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
