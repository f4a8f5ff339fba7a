//! Rebuild Use Case implementation

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::domain::entities::{
    DependencyDescriptor, DependencyReferenceDescriptor, ExtensionDescriptor,
    ExtensionLoadingContext, ExtensionProbeEntry, ExtensionReferenceProbeEntry,
};
use crate::domain::ports::{
    AssemblyProbingFolder, DependenciesFolder, ExtensionLoader, HostEnvironment,
};
use crate::domain::services::{DependencyOrder, LoaderSelection};
use crate::domain::value_objects::ChangeToken;
use crate::error::{LoaderError, LoaderResult};

use super::outcome::{
    CommitReport, LoadReport, RebuildPlan, Selection, SkipReason, SkippedModule,
};

/// Name of the lock file taken in the probing folder during a commit
pub const LOCK_FILE_NAME: &str = ".modhost.lock";

/// Exclusive lock on the probing folder, released on drop
struct CommitLock {
    file: fs::File,
}

impl CommitLock {
    fn acquire(path: &Path) -> LoaderResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| LoaderError::io(parent, e))?;
        }
        let file = fs::File::create(path).map_err(|e| LoaderError::io(path, e))?;
        file.lock_exclusive().map_err(|e| LoaderError::Lock {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self { file })
    }
}

impl Drop for CommitLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Rebuild Use Case
///
/// Runs one catalog rebuild as two phases. `plan` asks every loader about
/// every module and collects the effects of their decisions; `commit`
/// applies those effects to the probing folder under a lock.
pub struct RebuildUseCase {
    loaders: Vec<Arc<dyn ExtensionLoader>>,
    dependencies: Arc<dyn DependenciesFolder>,
    probing_folder: Arc<dyn AssemblyProbingFolder>,
    host_environment: Arc<dyn HostEnvironment>,
    lock_file: Option<PathBuf>,
    disabled_modules: Vec<String>,
}

impl RebuildUseCase {
    pub fn new(
        loaders: Vec<Arc<dyn ExtensionLoader>>,
        dependencies: Arc<dyn DependenciesFolder>,
        probing_folder: Arc<dyn AssemblyProbingFolder>,
        host_environment: Arc<dyn HostEnvironment>,
    ) -> Self {
        Self {
            loaders,
            dependencies,
            probing_folder,
            host_environment,
            lock_file: None,
            disabled_modules: Vec::new(),
        }
    }

    /// Serialize commits through an exclusive lock on `path`
    pub fn with_lock_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_file = Some(path.into());
        self
    }

    /// Module ids that take no part in rebuilds
    pub fn with_disabled_modules(mut self, ids: Vec<String>) -> Self {
        self.disabled_modules = ids;
        self
    }

    pub fn loaders(&self) -> &[Arc<dyn ExtensionLoader>] {
        &self.loaders
    }

    fn loader_for(&self, name: &str) -> Option<&Arc<dyn ExtensionLoader>> {
        self.loaders
            .iter()
            .find(|l| l.name().eq_ignore_ascii_case(name))
    }

    fn is_disabled(&self, id: &str) -> bool {
        self.disabled_modules
            .iter()
            .any(|d| d.eq_ignore_ascii_case(id))
    }

    /// Decide phase: nothing is written.
    pub fn plan(&self, descriptors: &[ExtensionDescriptor]) -> LoaderResult<RebuildPlan> {
        let previous = self.dependencies.load_descriptors()?;
        let mut plan = RebuildPlan::default();

        let mut enabled = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            if self.is_disabled(&descriptor.id) {
                debug!("Module \"{}\" is disabled", descriptor.id);
                plan.skipped.push(SkippedModule {
                    id: descriptor.id.clone(),
                    reason: SkipReason::Disabled,
                });
            } else {
                enabled.push(descriptor.clone());
            }
        }

        for descriptor in &enabled {
            for unknown in DependencyOrder::unknown_dependencies(descriptor, &enabled) {
                warn!(
                    "Module \"{}\" depends on \"{unknown}\", which is missing or disabled",
                    descriptor.id
                );
            }
        }

        // Winning probe entry per lowercase module id, for dependents
        let mut selected: HashMap<String, ExtensionProbeEntry> = HashMap::new();
        for descriptor in DependencyOrder::sort(&enabled)? {
            let previous_entry = previous
                .iter()
                .find(|p| p.name.eq_ignore_ascii_case(&descriptor.id));
            let Some(selection) = self.select(&descriptor, &selected, &mut plan)? else {
                continue;
            };
            self.activate(&descriptor, &selection, previous_entry, &mut plan.context)?;
            selected.insert(descriptor.id.to_ascii_lowercase(), selection.probe.clone());
            plan.selections.push(selection);
        }

        for recorded in &previous {
            let present = descriptors
                .iter()
                .find(|d| d.id.eq_ignore_ascii_case(&recorded.name));
            match present {
                None => {
                    let Some(loader) = self.loader_for(&recorded.loader_name) else {
                        warn!(
                            "Module \"{}\" was loaded by unknown loader \"{}\"",
                            recorded.name, recorded.loader_name
                        );
                        continue;
                    };
                    loader.extension_removed(&mut plan.context, recorded)?;
                    plan.removed.push(recorded.name.clone());
                }
                Some(descriptor) if plan.selection(&descriptor.id).is_none() => {
                    if let Some(loader) = self.loader_for(&recorded.loader_name) {
                        loader.extension_deactivated(&mut plan.context, descriptor)?;
                    }
                    plan.deactivated.push(recorded.name.clone());
                }
                Some(_) => {}
            }
        }

        Ok(plan)
    }

    /// Probe every loader for `descriptor` and pick the preferred claim
    /// compatible with the claims already selected for its dependencies
    fn select(
        &self,
        descriptor: &ExtensionDescriptor,
        selected: &HashMap<String, ExtensionProbeEntry>,
        plan: &mut RebuildPlan,
    ) -> LoaderResult<Option<Selection>> {
        let mut candidates = Vec::new();
        for loader in &self.loaders {
            if let Some(entry) = loader.probe(descriptor)? {
                candidates.push(entry);
            }
        }
        if candidates.is_empty() {
            warn!("No loader found for module \"{}\"", descriptor.id);
            plan.skipped.push(SkippedModule {
                id: descriptor.id.clone(),
                reason: SkipReason::NoLoader,
            });
            return Ok(None);
        }

        let dependency_probes: Vec<ExtensionProbeEntry> = descriptor
            .dependencies
            .iter()
            .filter_map(|d| selected.get(&d.to_ascii_lowercase()).cloned())
            .collect();

        for candidate in LoaderSelection::rank(candidates) {
            let Some(loader) = self.loader_for(&candidate.loader.name) else {
                continue;
            };
            if !loader.is_compatible_with_module_references(descriptor, &dependency_probes) {
                continue;
            }
            let references = loader.probe_references(descriptor)?;
            return Ok(Some(Selection {
                probe: candidate,
                references,
            }));
        }

        warn!(
            "No loader for module \"{}\" is compatible with its dependencies",
            descriptor.id
        );
        plan.skipped.push(SkippedModule {
            id: descriptor.id.clone(),
            reason: SkipReason::IncompatibleReferences,
        });
        Ok(None)
    }

    /// Drive the lifecycle callbacks for a selected module
    fn activate(
        &self,
        descriptor: &ExtensionDescriptor,
        selection: &Selection,
        previous: Option<&DependencyDescriptor>,
        ctx: &mut ExtensionLoadingContext,
    ) -> LoaderResult<()> {
        let Some(loader) = self.loader_for(selection.loader_name()) else {
            return Ok(());
        };

        if let Some(previous) = previous {
            if !previous.loader_name.eq_ignore_ascii_case(loader.name()) {
                info!(
                    "Module \"{}\" switches from loader \"{}\" to \"{}\"",
                    descriptor.id,
                    previous.loader_name,
                    loader.name()
                );
                if let Some(old) = self.loader_for(&previous.loader_name) {
                    old.extension_deactivated(ctx, descriptor)?;
                }
            }
        }

        loader.extension_activated(ctx, descriptor)?;
        for reference in &selection.references {
            loader.reference_activated(ctx, reference)?;
        }

        let Some(previous) = previous else {
            return Ok(());
        };
        for dropped in previous.references.iter().filter(|old| {
            !selection
                .references
                .iter()
                .any(|r| r.name.eq_ignore_ascii_case(&old.name))
        }) {
            let Some(old_loader) = self.loader_for(&dropped.loader_name) else {
                continue;
            };
            let entry = ExtensionReferenceProbeEntry {
                descriptor: descriptor.clone(),
                loader: old_loader.info(),
                name: dropped.name.clone(),
                virtual_path: Some(dropped.virtual_path.clone()).filter(|p| !p.is_empty()),
            };
            old_loader.reference_deactivated(ctx, &entry)?;
        }
        Ok(())
    }

    /// Apply phase: deletes, then copies, then the dependencies file, then
    /// the restart request.
    pub fn commit(&self, plan: &RebuildPlan) -> LoaderResult<CommitReport> {
        let _lock = match &self.lock_file {
            Some(path) => Some(CommitLock::acquire(path)?),
            None => None,
        };

        let mut report = CommitReport::default();
        for name in plan.context.deletes() {
            self.probing_folder.delete_assembly(name)?;
            info!("Deleted \"{name}\" from probing directory");
            report.deleted.push(name.to_string());
        }
        for (name, source) in plan.context.copies() {
            self.probing_folder.store_assembly(name, source)?;
            info!("Copied \"{}\" to probing directory as \"{name}\"", source.display());
            report.copied.push(name.to_string());
        }

        let dependencies = plan.dependencies();
        self.dependencies.store_descriptors(&dependencies)?;
        report.dependencies_stored = dependencies.len();

        if plan.restart_required() {
            report.restart_required = true;
            report.restart_reasons = plan.context.restart_reasons().map(str::to_string).collect();
            self.host_environment
                .restart_app_domain(&report.restart_reasons)?;
        }
        Ok(report)
    }

    /// Plan and commit in one go
    pub fn rebuild(
        &self,
        descriptors: &[ExtensionDescriptor],
    ) -> LoaderResult<(RebuildPlan, CommitReport)> {
        let plan = self.plan(descriptors)?;
        let report = self.commit(&plan)?;
        Ok((plan, report))
    }

    /// Map the selected modules, references first
    pub fn load(&self, selections: &[Selection]) -> LoaderResult<LoadReport> {
        let mut report = LoadReport::default();
        for selection in selections {
            let Some(loader) = self.loader_for(selection.loader_name()) else {
                report.missing.push(selection.module_id().to_string());
                continue;
            };
            for reference in &selection.references {
                let descriptor = DependencyReferenceDescriptor {
                    name: reference.name.clone(),
                    loader_name: reference.loader.name.clone(),
                    virtual_path: reference.virtual_path.clone().unwrap_or_default(),
                };
                if let Some(assembly) = loader.load_reference(&descriptor)? {
                    report.references.push(assembly);
                }
            }
            match loader.load(&selection.probe.descriptor)? {
                Some(entry) => report.extensions.push(entry),
                None => {
                    warn!(
                        "Loader \"{}\" found nothing to load for module \"{}\"",
                        loader.name(),
                        selection.module_id()
                    );
                    report.missing.push(selection.module_id().to_string());
                }
            }
        }
        Ok(report)
    }

    /// Collect change tokens from every loader for every enabled module
    pub fn monitor(
        &self,
        descriptors: &[ExtensionDescriptor],
        register: &mut dyn FnMut(ChangeToken),
    ) -> LoaderResult<()> {
        for descriptor in descriptors.iter().filter(|d| !self.is_disabled(&d.id)) {
            for loader in &self.loaders {
                loader.monitor(descriptor, register)?;
            }
        }
        Ok(())
    }
}
