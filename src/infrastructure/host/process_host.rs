//! Process Host Environment
//!
//! The process this crate runs in is the host. A binary it has mapped
//! cannot be unmapped, so a restart request is made durable in a marker
//! file for the supervisor and surfaced to the caller, who is expected to
//! exit.
//!
//! The marker is TOML:
//!
//! ```toml
//! requested_at = "2026-01-01T00:00:00+00:00"
//! reasons = ["Module \"Foo\" has a newer binary but its assembly is loaded"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::LoadedAssemblies;
use crate::domain::ports::HostEnvironment;
use crate::error::{LoaderError, LoaderResult};

/// Content of the restart marker file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestartMarker {
    pub requested_at: String,
    #[serde(default)]
    pub reasons: Vec<String>,
}

pub struct ProcessHostEnvironment {
    loaded: Arc<LoadedAssemblies>,
    restart_marker: Option<PathBuf>,
    restart_requested: AtomicBool,
}

impl ProcessHostEnvironment {
    pub fn new(loaded: Arc<LoadedAssemblies>) -> Self {
        Self {
            loaded,
            restart_marker: None,
            restart_requested: AtomicBool::new(false),
        }
    }

    /// Write restart requests to `path`
    pub fn with_restart_marker(mut self, path: impl Into<PathBuf>) -> Self {
        self.restart_marker = Some(path.into());
        self
    }

    pub fn restart_marker(&self) -> Option<&Path> {
        self.restart_marker.as_deref()
    }

    pub fn loaded_assemblies(&self) -> &Arc<LoadedAssemblies> {
        &self.loaded
    }

    /// Whether `restart_app_domain` was called since this host started
    pub fn restart_requested(&self) -> bool {
        self.restart_requested.load(Ordering::SeqCst)
    }

    fn write_marker(&self, path: &Path, reasons: &[String]) -> LoaderResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LoaderError::io(parent, e))?;
        }
        let marker = RestartMarker {
            requested_at: Utc::now().to_rfc3339(),
            reasons: reasons.to_vec(),
        };
        let content = toml::to_string(&marker).map_err(|e| {
            LoaderError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        fs::write(path, content).map_err(|e| LoaderError::io(path, e))
    }
}

impl HostEnvironment for ProcessHostEnvironment {
    fn is_assembly_loaded(&self, name: &str) -> bool {
        self.loaded.contains(name)
    }

    fn restart_app_domain(&self, reasons: &[String]) -> LoaderResult<()> {
        self.restart_requested.store(true, Ordering::SeqCst);
        for reason in reasons {
            warn!("Restart required: {reason}");
        }
        if let Some(marker) = &self.restart_marker {
            self.write_marker(marker, reasons)?;
        }
        Ok(())
    }
}
