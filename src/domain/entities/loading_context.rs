//! Extension loading context
//!
//! The unit of work of one catalog rebuild. Loader callbacks only record
//! effects here; nothing touches the probing folder until the whole batch
//! has been decided and the plan is committed.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A side effect decided during a rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LoadingEffect {
    /// Store `source` in the probing folder under `name`
    Copy { name: String, source: PathBuf },
    /// Remove `name` from the probing folder
    Delete { name: String },
    /// The hosting process must be restarted for the batch to take effect
    RequestRestart { reason: String },
}

/// Accumulates the effects of one rebuild batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtensionLoadingContext {
    effects: Vec<LoadingEffect>,
    #[serde(rename = "restart_required")]
    restart_app_domain: bool,
}

impl ExtensionLoadingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a copy. Returns false if the same copy is already scheduled.
    pub fn schedule_copy(&mut self, name: impl Into<String>, source: impl Into<PathBuf>) -> bool {
        let name = name.into();
        let source = source.into();
        let duplicate = self.effects.iter().any(|e| {
            matches!(e, LoadingEffect::Copy { name: n, source: s } if *n == name && *s == source)
        });
        if duplicate {
            return false;
        }
        self.effects.push(LoadingEffect::Copy { name, source });
        true
    }

    /// Record a delete. Returns false if it is already scheduled.
    pub fn schedule_delete(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let duplicate = self
            .effects
            .iter()
            .any(|e| matches!(e, LoadingEffect::Delete { name: n } if *n == name));
        if duplicate {
            return false;
        }
        self.effects.push(LoadingEffect::Delete { name });
        true
    }

    /// Set the restart flag. It stays set for the rest of the batch.
    pub fn request_restart(&mut self, reason: impl Into<String>) {
        self.restart_app_domain = true;
        self.effects.push(LoadingEffect::RequestRestart {
            reason: reason.into(),
        });
    }

    pub fn restart_required(&self) -> bool {
        self.restart_app_domain
    }

    /// All effects in the order they were decided
    pub fn effects(&self) -> &[LoadingEffect] {
        &self.effects
    }

    /// Scheduled copies as `(name, source)`
    pub fn copies(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.effects.iter().filter_map(|e| match e {
            LoadingEffect::Copy { name, source } => Some((name.as_str(), source.as_path())),
            _ => None,
        })
    }

    pub fn copy_count(&self) -> usize {
        self.copies().count()
    }

    /// Scheduled deletes
    pub fn deletes(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|e| match e {
            LoadingEffect::Delete { name } => Some(name.as_str()),
            _ => None,
        })
    }

    pub fn delete_count(&self) -> usize {
        self.deletes().count()
    }

    /// Why a restart was requested, one entry per request
    pub fn restart_reasons(&self) -> impl Iterator<Item = &str> {
        self.effects.iter().filter_map(|e| match e {
            LoadingEffect::RequestRestart { reason } => Some(reason.as_str()),
            _ => None,
        })
    }

    /// Nothing to apply and no restart needed
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}
