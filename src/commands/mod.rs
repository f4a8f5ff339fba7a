//! Command handlers
//!
//! Each handler takes the `CommandContext` built from the global flags and
//! reports whether the host needs a restart, which `main` turns into the
//! process exit code.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use modhost::presentation::{command_json, OutputFormat, TextRenderer};
use modhost::{Config, ModuleHost};

pub mod load;
pub mod probe;
pub mod rebuild;
pub mod store;
pub mod watch;

/// Exit code when the command finished but the host must restart
pub const RESTART_EXIT_CODE: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    RestartRequired,
}

impl Outcome {
    pub fn from_restart(restart_required: bool) -> Self {
        if restart_required {
            Outcome::RestartRequired
        } else {
            Outcome::Success
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::RestartRequired => RESTART_EXIT_CODE,
        }
    }
}

pub struct CommandContext {
    pub host: ModuleHost,
    pub format: OutputFormat,
    pub renderer: TextRenderer,
}

impl CommandContext {
    /// Resolve configuration and wire the host
    pub fn open(config_path: Option<&Path>, json: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
        let loaded = Config::discover(config_path, &cwd)?;
        for warning in &loaded.warnings {
            warn!("{warning}");
        }
        match loaded.source.path() {
            Some(path) => debug!("Using configuration {}", path.display()),
            None => debug!("Using built-in configuration defaults"),
        }

        let app_root = loaded.app_root();
        let host = ModuleHost::new(loaded.config, &app_root)
            .with_context(|| format!("Cannot open application root {}", app_root.display()))?;

        Ok(Self {
            host,
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            renderer: TextRenderer::default(),
        })
    }

    /// Print `body` as JSON, or the text produced by `text`
    pub fn emit<T, F>(&self, command: &str, body: &T, text: F)
    where
        T: Serialize,
        F: FnOnce(&TextRenderer) -> String,
    {
        match self.format {
            OutputFormat::Json => println!("{}", command_json(command, body)),
            OutputFormat::Text => print!("{}", text(&self.renderer)),
        }
    }
}
