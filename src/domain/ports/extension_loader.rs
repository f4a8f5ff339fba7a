//! ExtensionLoader port - one strategy for turning a module into code
//!
//! Several loaders may claim the same module. The rebuild coordinator
//! probes all of them, picks a winner per module by timestamp and
//! `order`, and then drives the winner through the lifecycle callbacks.
//!
//! Callbacks never perform I/O on the probing folder: they record effects
//! on the `ExtensionLoadingContext` and the coordinator applies them once
//! the whole batch is decided.

use crate::domain::entities::{
    DependencyDescriptor, DependencyReferenceDescriptor, ExtensionDescriptor, ExtensionEntry,
    ExtensionLoadingContext, ExtensionProbeEntry, ExtensionReferenceProbeEntry, LoadedAssembly,
};
use crate::domain::value_objects::{ChangeToken, LoaderInfo, LoaderKind};
use crate::error::LoaderResult;

pub trait ExtensionLoader: Send + Sync {
    /// Name recorded in the dependencies file
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    fn kind(&self) -> LoaderKind;

    /// Priority; lower wins ties
    fn order(&self) -> i32;

    fn info(&self) -> LoaderInfo {
        LoaderInfo::new(self.name(), self.kind(), self.order())
    }

    fn is_dynamically_compiled(&self) -> bool {
        self.kind().is_dynamically_compiled()
    }

    /// Claim a module, or `None` for "no opinion"
    fn probe(&self, descriptor: &ExtensionDescriptor) -> LoaderResult<Option<ExtensionProbeEntry>>;

    /// Auxiliary binaries shipped with the module
    fn probe_references(
        &self,
        _descriptor: &ExtensionDescriptor,
    ) -> LoaderResult<Vec<ExtensionReferenceProbeEntry>> {
        Ok(Vec::new())
    }

    /// Whether this loader can load `extension` given the probe entries
    /// already selected for the modules it depends on
    fn is_compatible_with_module_references(
        &self,
        _extension: &ExtensionDescriptor,
        _references: &[ExtensionProbeEntry],
    ) -> bool {
        true
    }

    fn load(&self, descriptor: &ExtensionDescriptor) -> LoaderResult<Option<ExtensionEntry>>;

    fn load_reference(
        &self,
        _reference: &DependencyReferenceDescriptor,
    ) -> LoaderResult<Option<LoadedAssembly>> {
        Ok(None)
    }

    fn extension_activated(
        &self,
        _ctx: &mut ExtensionLoadingContext,
        _extension: &ExtensionDescriptor,
    ) -> LoaderResult<()> {
        Ok(())
    }

    fn extension_deactivated(
        &self,
        _ctx: &mut ExtensionLoadingContext,
        _extension: &ExtensionDescriptor,
    ) -> LoaderResult<()> {
        Ok(())
    }

    fn extension_removed(
        &self,
        _ctx: &mut ExtensionLoadingContext,
        _dependency: &DependencyDescriptor,
    ) -> LoaderResult<()> {
        Ok(())
    }

    fn reference_activated(
        &self,
        _ctx: &mut ExtensionLoadingContext,
        _reference: &ExtensionReferenceProbeEntry,
    ) -> LoaderResult<()> {
        Ok(())
    }

    fn reference_deactivated(
        &self,
        _ctx: &mut ExtensionLoadingContext,
        _reference: &ExtensionReferenceProbeEntry,
    ) -> LoaderResult<()> {
        Ok(())
    }

    /// Register change tokens for whatever this loader's decision for
    /// `descriptor` depends on
    fn monitor(
        &self,
        _descriptor: &ExtensionDescriptor,
        _register: &mut dyn FnMut(ChangeToken),
    ) -> LoaderResult<()> {
        Ok(())
    }
}
