//! Precompiled extension loader
//!
//! Loads a module from the binary shipped in its own `bin` directory:
//!
//! ```text
//! ~/Modules/Foo/bin/Foo.dll       <- module binary
//! ~/Modules/Foo/bin/Markdig.dll   <- reference
//! ```
//!
//! The binary is never mapped from there. Activation schedules a copy into
//! the probing folder and `load` maps the copy, so the source can be
//! rebuilt while the host runs. Once a copy is mapped it cannot be replaced
//! in place: any change to it schedules a host restart instead.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{
    DependencyDescriptor, DependencyReferenceDescriptor, ExtensionDescriptor, ExtensionEntry,
    ExtensionLoadingContext, ExtensionProbeEntry, ExtensionReferenceProbeEntry, LoadedAssembly,
};
use crate::domain::ports::{
    AssemblyProbingFolder, ExtensionLoader, HostEnvironment, VirtualPathMonitor,
    VirtualPathProvider,
};
use crate::domain::services::Staleness;
use crate::domain::value_objects::{virtual_path, ChangeToken, LoaderKind};
use crate::error::LoaderResult;

/// Priority of the precompiled loader among loader strategies
pub const PRECOMPILED_LOADER_ORDER: i32 = 30;

/// Loader settings
#[derive(Debug, Clone)]
pub struct PrecompiledOptions {
    /// Turn the loader off; it then claims nothing
    pub disabled: bool,
    /// Extension of module binaries, without the dot
    pub binary_extension: String,
    pub staleness: Staleness,
}

impl Default for PrecompiledOptions {
    fn default() -> Self {
        Self {
            disabled: false,
            binary_extension: "dll".to_string(),
            staleness: Staleness::exact(),
        }
    }
}

pub struct PrecompiledExtensionLoader {
    host_environment: Arc<dyn HostEnvironment>,
    probing_folder: Arc<dyn AssemblyProbingFolder>,
    virtual_path_provider: Arc<dyn VirtualPathProvider>,
    virtual_path_monitor: Arc<dyn VirtualPathMonitor>,
    options: PrecompiledOptions,
}

impl PrecompiledExtensionLoader {
    pub fn new(
        host_environment: Arc<dyn HostEnvironment>,
        probing_folder: Arc<dyn AssemblyProbingFolder>,
        virtual_path_provider: Arc<dyn VirtualPathProvider>,
        virtual_path_monitor: Arc<dyn VirtualPathMonitor>,
    ) -> Self {
        Self {
            host_environment,
            probing_folder,
            virtual_path_provider,
            virtual_path_monitor,
            options: PrecompiledOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PrecompiledOptions) -> Self {
        self.options = options;
        self
    }

    pub fn disabled(&self) -> bool {
        self.options.disabled
    }

    /// Virtual path of the module's `bin` directory
    pub fn bin_directory(&self, descriptor: &ExtensionDescriptor) -> String {
        self.virtual_path_provider
            .combine(&[descriptor.location.as_str(), descriptor.id.as_str(), "bin"])
    }

    /// Virtual path of the module binary, `None` if the file does not exist
    pub fn get_assembly_path(&self, descriptor: &ExtensionDescriptor) -> Option<String> {
        let file_name = format!("{}.{}", descriptor.id, self.options.binary_extension);
        let assembly_path = self.virtual_path_provider.combine(&[
            descriptor.location.as_str(),
            descriptor.id.as_str(),
            "bin",
            file_name.as_str(),
        ]);
        if !self.virtual_path_provider.file_exists(&assembly_path) {
            return None;
        }
        Some(assembly_path)
    }

    fn is_binary(&self, path: &str) -> bool {
        virtual_path::extension(path)
            .map(|ext| ext.eq_ignore_ascii_case(&self.options.binary_extension))
            .unwrap_or(false)
    }

    /// Schedule a copy of `source_virtual_path` into the probing folder
    /// unless the stored copy of `name` is up to date. Requests a restart
    /// when `name` is already mapped into the process.
    fn copy_if_stale(
        &self,
        ctx: &mut ExtensionLoadingContext,
        name: &str,
        source_virtual_path: &str,
        callback: &str,
        what: &str,
    ) -> LoaderResult<()> {
        let source_file = self.virtual_path_provider.map_path(source_virtual_path);
        let source_modified = self
            .virtual_path_provider
            .get_file_last_write_time_utc(source_virtual_path)?;
        let stored_modified = self.probing_folder.get_assembly_date_time_utc(name)?;

        let decision = self.options.staleness.decide(source_modified, stored_modified);
        if !decision.needs_copy() {
            debug!("{callback}: {what} \"{name}\" is up to date in probing directory");
            return Ok(());
        }

        if ctx.schedule_copy(name, &source_file) {
            info!(
                "{callback}: Copying assembly \"{name}\" from \"{}\" to probing directory ({decision:?})",
                source_file.display()
            );
        }

        if self.host_environment.is_assembly_loaded(name) {
            info!(
                "{callback}: {what} \"{name}\" is activated with newer file and its assembly is loaded, forcing AppDomain restart"
            );
            ctx.request_restart(format!(
                "{what} \"{name}\" has a newer binary but its assembly is loaded"
            ));
        }
        Ok(())
    }

    /// Schedule deletion of the stored copy of `name`, requesting a restart
    /// when it is mapped into the process
    fn delete_stored(&self, ctx: &mut ExtensionLoadingContext, name: &str, callback: &str, why: &str) {
        if self.probing_folder.assembly_exists(name) && ctx.schedule_delete(name) {
            info!("{callback}: Deleting assembly \"{name}\" from probing directory");
        }

        if self.host_environment.is_assembly_loaded(name) {
            info!(
                "{callback}: Module \"{name}\" is {why} and its assembly is loaded, forcing AppDomain restart"
            );
            ctx.request_restart(format!("module \"{name}\" is {why} but its assembly is loaded"));
        }
    }
}

impl ExtensionLoader for PrecompiledExtensionLoader {
    fn kind(&self) -> LoaderKind {
        LoaderKind::Precompiled
    }

    fn order(&self) -> i32 {
        PRECOMPILED_LOADER_ORDER
    }

    fn probe(&self, descriptor: &ExtensionDescriptor) -> LoaderResult<Option<ExtensionProbeEntry>> {
        if self.options.disabled {
            return Ok(None);
        }

        let Some(assembly_path) = self.get_assembly_path(descriptor) else {
            return Ok(None);
        };

        Ok(Some(ExtensionProbeEntry {
            descriptor: descriptor.clone(),
            loader: self.info(),
            last_write_time_utc: self
                .virtual_path_provider
                .get_file_last_write_time_utc(&assembly_path)?,
            virtual_path: assembly_path,
        }))
    }

    fn probe_references(
        &self,
        descriptor: &ExtensionDescriptor,
    ) -> LoaderResult<Vec<ExtensionReferenceProbeEntry>> {
        let Some(assembly_path) = self.get_assembly_path(descriptor) else {
            return Ok(Vec::new());
        };

        let directory = self.virtual_path_provider.get_directory_name(&assembly_path);
        let references = self
            .virtual_path_provider
            .list_files(&directory)?
            .into_iter()
            .filter(|path| self.is_binary(path))
            .filter(|path| !virtual_path::file_stem(path).eq_ignore_ascii_case(&descriptor.id))
            .map(|path| ExtensionReferenceProbeEntry {
                descriptor: descriptor.clone(),
                loader: self.info(),
                name: virtual_path::file_stem(&path).to_string(),
                virtual_path: Some(path),
            })
            .collect();
        Ok(references)
    }

    fn is_compatible_with_module_references(
        &self,
        extension: &ExtensionDescriptor,
        references: &[ExtensionProbeEntry],
    ) -> bool {
        // A precompiled binary was linked against a fixed identity of each
        // dependency; a dynamically compiled dependency gets a new one on
        // every rebuild.
        let compatible = references.iter().all(|r| !r.loader.is_dynamically_compiled());
        if !compatible {
            info!(
                "Extension \"{}\" will not be loaded as pre-compiled extension because one or more referenced extension is dynamically compiled",
                extension.id
            );
        }
        compatible
    }

    fn load(&self, descriptor: &ExtensionDescriptor) -> LoaderResult<Option<ExtensionEntry>> {
        if self.options.disabled {
            return Ok(None);
        }

        let Some(assembly) = self.probing_folder.load_assembly(&descriptor.id)? else {
            return Ok(None);
        };

        info!(
            "Loaded pre-compiled extension \"{}\": assembly name=\"{}\"",
            descriptor.name,
            assembly.full_name()
        );

        Ok(Some(ExtensionEntry {
            descriptor: descriptor.clone(),
            exported_types: assembly.exported_types.clone(),
            assembly,
        }))
    }

    fn load_reference(
        &self,
        reference: &DependencyReferenceDescriptor,
    ) -> LoaderResult<Option<LoadedAssembly>> {
        self.probing_folder.load_assembly(&reference.name)
    }

    fn extension_activated(
        &self,
        ctx: &mut ExtensionLoadingContext,
        extension: &ExtensionDescriptor,
    ) -> LoaderResult<()> {
        let Some(assembly_path) = self.get_assembly_path(extension) else {
            debug!(
                "ExtensionActivated: Module \"{}\" has no binary, nothing to copy",
                extension.id
            );
            return Ok(());
        };
        self.copy_if_stale(
            ctx,
            &extension.id,
            &assembly_path,
            "ExtensionActivated",
            "Module",
        )
    }

    fn extension_deactivated(
        &self,
        ctx: &mut ExtensionLoadingContext,
        extension: &ExtensionDescriptor,
    ) -> LoaderResult<()> {
        self.delete_stored(ctx, &extension.id, "ExtensionDeactivated", "deactivated");
        Ok(())
    }

    fn extension_removed(
        &self,
        ctx: &mut ExtensionLoadingContext,
        dependency: &DependencyDescriptor,
    ) -> LoaderResult<()> {
        self.delete_stored(ctx, &dependency.name, "ExtensionRemoved", "removed");
        Ok(())
    }

    fn reference_activated(
        &self,
        ctx: &mut ExtensionLoadingContext,
        reference: &ExtensionReferenceProbeEntry,
    ) -> LoaderResult<()> {
        let Some(source_path) = reference.virtual_path.as_deref().filter(|p| !p.is_empty())
        else {
            return Ok(());
        };
        self.copy_if_stale(
            ctx,
            &reference.name,
            source_path,
            "ReferenceActivated",
            "Reference",
        )
    }

    fn monitor(
        &self,
        descriptor: &ExtensionDescriptor,
        register: &mut dyn FnMut(ChangeToken),
    ) -> LoaderResult<()> {
        if let Some(assembly_path) = self.get_assembly_path(descriptor) {
            info!("Monitoring virtual path \"{assembly_path}\"");
            register(self.virtual_path_monitor.when_path_changes(&assembly_path)?);
            return Ok(());
        }

        // No binary yet: a build dropping one into `bin` later is a
        // configuration change too.
        let assembly_directory = self.bin_directory(descriptor);
        if self.virtual_path_provider.directory_exists(&assembly_directory) {
            info!("Monitoring virtual path \"{assembly_directory}\"");
            register(
                self.virtual_path_monitor
                    .when_path_changes(&assembly_directory)?,
            );
        }
        Ok(())
    }
}
