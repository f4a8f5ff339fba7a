//! Rebuild outcomes
//!
//! `RebuildPlan` is what the decide phase produced; `CommitReport` and
//! `LoadReport` describe what the apply phases did with it.

use serde::Serialize;

use crate::domain::entities::{
    DependencyDescriptor, DependencyReferenceDescriptor, ExtensionEntry, ExtensionLoadingContext,
    ExtensionProbeEntry, ExtensionReferenceProbeEntry, LoadedAssembly,
};

/// The loader claim chosen for one module, with the references it brings
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub probe: ExtensionProbeEntry,
    pub references: Vec<ExtensionReferenceProbeEntry>,
}

impl Selection {
    pub fn module_id(&self) -> &str {
        &self.probe.descriptor.id
    }

    pub fn loader_name(&self) -> &str {
        &self.probe.loader.name
    }

    /// What the dependencies file records for this selection
    pub fn to_dependency(&self) -> DependencyDescriptor {
        DependencyDescriptor {
            name: self.probe.descriptor.id.clone(),
            loader_name: self.probe.loader.name.clone(),
            virtual_path: self.probe.virtual_path.clone(),
            references: self
                .references
                .iter()
                .map(|r| DependencyReferenceDescriptor {
                    name: r.name.clone(),
                    loader_name: r.loader.name.clone(),
                    virtual_path: r.virtual_path.clone().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

/// Why a discovered module takes no part in this rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Listed in `modules.disabled`
    Disabled,
    /// No loader claimed it
    NoLoader,
    /// Every claiming loader rejected the loaders of its dependencies
    IncompatibleReferences,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedModule {
    pub id: String,
    pub reason: SkipReason,
}

/// Decisions of one rebuild batch, not yet applied
#[derive(Debug, Clone, Default, Serialize)]
pub struct RebuildPlan {
    pub selections: Vec<Selection>,
    pub skipped: Vec<SkippedModule>,
    /// Previously recorded modules that no longer exist
    pub removed: Vec<String>,
    /// Previously recorded modules that are present but no longer selected
    pub deactivated: Vec<String>,
    pub context: ExtensionLoadingContext,
}

impl RebuildPlan {
    /// Dependency descriptors to persist on commit
    pub fn dependencies(&self) -> Vec<DependencyDescriptor> {
        self.selections.iter().map(Selection::to_dependency).collect()
    }

    pub fn restart_required(&self) -> bool {
        self.context.restart_required()
    }

    /// Nothing to copy, delete or restart
    pub fn is_noop(&self) -> bool {
        self.context.is_empty()
    }

    pub fn selection(&self, module_id: &str) -> Option<&Selection> {
        self.selections
            .iter()
            .find(|s| s.module_id().eq_ignore_ascii_case(module_id))
    }
}

/// What a commit applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    pub deleted: Vec<String>,
    pub copied: Vec<String>,
    pub dependencies_stored: usize,
    pub restart_required: bool,
    pub restart_reasons: Vec<String>,
}

impl CommitReport {
    pub fn has_changes(&self) -> bool {
        !self.deleted.is_empty() || !self.copied.is_empty()
    }
}

/// What was mapped into the process
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub extensions: Vec<ExtensionEntry>,
    pub references: Vec<LoadedAssembly>,
    /// Selected modules whose loader found nothing to load
    pub missing: Vec<String>,
}
