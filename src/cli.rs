use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// modhost - extension probing, caching and hot-swap coordination
#[derive(Parser, Debug)]
#[command(name = "modhost")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./modhost.toml, then the user config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show which loader claims each module, with its references
    Probe,

    /// Decide which binaries to copy or delete, then apply it
    Rebuild {
        /// Print the plan without touching the probing folder
        #[arg(long)]
        dry_run: bool,
    },

    /// Rebuild, then map every selected module into this process
    Load,

    /// List the binaries held by the probing folder
    Store,

    /// Rebuild whenever a module or its binaries change
    Watch {
        /// Only rebuild; do not map modules after each rebuild
        #[arg(long)]
        no_load: bool,
    },
}
