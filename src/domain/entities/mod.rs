//! Domain Entities
//!
//! - `ExtensionDescriptor` - A discovered module
//! - `DependencyDescriptor` - What the last rebuild recorded about a module
//! - `ExtensionProbeEntry` / `ExtensionReferenceProbeEntry` - Loader claims
//! - `ExtensionEntry` - A loaded module
//! - `ExtensionLoadingContext` - Effects decided during one rebuild

mod descriptor;
mod entry;
mod loading_context;

pub use descriptor::{DependencyDescriptor, DependencyReferenceDescriptor, ExtensionDescriptor};
pub use entry::{
    AssemblyHandle, ExtensionEntry, ExtensionProbeEntry, ExtensionReferenceProbeEntry,
    LoadedAssembly,
};
pub use loading_context::{ExtensionLoadingContext, LoadingEffect};
