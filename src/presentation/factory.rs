//! Use Case Factory
//!
//! Wires the local infrastructure behind the domain ports from a resolved
//! `Config`. This is the dependency injection point for the application:
//! the CLI builds one `ModuleHost` per invocation, integration tests build
//! one over a temporary application root.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::application::{RebuildUseCase, WatchOptions, WatchUseCase, LOCK_FILE_NAME};
use crate::config::Config;
use crate::domain::entities::{
    ExtensionDescriptor, ExtensionProbeEntry, ExtensionReferenceProbeEntry,
};
use crate::domain::ports::{
    AssemblyProbingFolder, ExtensionLoader, StoredAssembly, VirtualPathProvider,
};
use crate::error::LoaderResult;
use crate::infrastructure::{
    LoadedAssemblies, LocalProbingFolder, LocalVirtualPathProvider, ManifestDiscovery,
    NotifyPathMonitor, ProcessHostEnvironment, TomlDependenciesFolder,
};
use crate::loaders::PrecompiledExtensionLoader;

/// Every loader's opinion about one module
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub module: ExtensionDescriptor,
    pub claims: Vec<ExtensionProbeEntry>,
    pub references: Vec<ExtensionReferenceProbeEntry>,
}

pub struct ModuleHost {
    config: Config,
    paths: Arc<LocalVirtualPathProvider>,
    loaded: Arc<LoadedAssemblies>,
    host_environment: Arc<ProcessHostEnvironment>,
    probing_folder: Arc<LocalProbingFolder>,
    dependencies: Arc<TomlDependenciesFolder>,
    discovery: Arc<ManifestDiscovery>,
    loaders: Vec<Arc<dyn ExtensionLoader>>,
}

impl ModuleHost {
    /// Build the host for `config` rooted at the physical `app_root`
    pub fn new(config: Config, app_root: impl Into<PathBuf>) -> LoaderResult<Self> {
        let paths = Arc::new(LocalVirtualPathProvider::new(app_root));
        let loaded = Arc::new(LoadedAssemblies::new());

        let host_environment = Arc::new(
            ProcessHostEnvironment::new(loaded.clone())
                .with_restart_marker(paths.map_path(&config.paths.restart_marker)),
        );
        let probing_folder = Arc::new(
            LocalProbingFolder::new(paths.map_path(&config.paths.probing), loaded.clone())
                .with_extension(config.loader.binary_extension.clone()),
        );
        let dependencies = Arc::new(TomlDependenciesFolder::new(
            paths.map_path(&config.paths.dependencies),
        ));
        let monitor = Arc::new(NotifyPathMonitor::new(paths.clone())?);

        let discovery = Arc::new(
            ManifestDiscovery::new(paths.clone(), config.paths.modules.clone())
                .with_monitor(monitor.clone()),
        );
        let precompiled = PrecompiledExtensionLoader::new(
            host_environment.clone(),
            probing_folder.clone(),
            paths.clone(),
            monitor,
        )
        .with_options(config.precompiled_options());
        let loaders: Vec<Arc<dyn ExtensionLoader>> = vec![Arc::new(precompiled)];

        Ok(Self {
            config,
            paths,
            loaded,
            host_environment,
            probing_folder,
            dependencies,
            discovery,
            loaders,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn app_root(&self) -> &Path {
        self.paths.root()
    }

    pub fn probing_root(&self) -> &Path {
        self.probing_folder.root()
    }

    pub fn dependencies_file(&self) -> &Path {
        self.dependencies.path()
    }

    pub fn host_environment(&self) -> &ProcessHostEnvironment {
        &self.host_environment
    }

    pub fn loaded_assemblies(&self) -> &LoadedAssemblies {
        &self.loaded
    }

    pub fn discover(&self) -> LoaderResult<Vec<ExtensionDescriptor>> {
        self.discovery.discover()
    }

    /// Ask every loader about every discovered module without deciding
    pub fn probe(&self) -> LoaderResult<Vec<ProbeReport>> {
        let mut reports = Vec::new();
        for module in self.discover()? {
            let mut claims = Vec::new();
            let mut references = Vec::new();
            for loader in &self.loaders {
                if let Some(claim) = loader.probe(&module)? {
                    claims.push(claim);
                    references.extend(loader.probe_references(&module)?);
                }
            }
            reports.push(ProbeReport {
                module,
                claims,
                references,
            });
        }
        Ok(reports)
    }

    pub fn stored_assemblies(&self) -> LoaderResult<Vec<StoredAssembly>> {
        self.probing_folder.list_assemblies()
    }

    pub fn rebuild_use_case(&self) -> RebuildUseCase {
        RebuildUseCase::new(
            self.loaders.clone(),
            self.dependencies.clone(),
            self.probing_folder.clone(),
            self.host_environment.clone(),
        )
        .with_lock_file(self.probing_folder.root().join(LOCK_FILE_NAME))
        .with_disabled_modules(self.config.modules.disabled.clone())
    }

    pub fn watch_use_case(&self, options: WatchOptions) -> WatchUseCase {
        WatchUseCase::new(self.rebuild_use_case(), self.discovery.clone(), options)
    }
}
