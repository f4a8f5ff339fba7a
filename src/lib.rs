//! modhost - extension probing, caching and hot-swap coordination
//!
//! A modular host discovers modules under its modules roots, asks each
//! extension loader whether it can load them, copies the winning binaries
//! into a probing folder and maps them from there. When a mapped binary
//! changes on disk the host cannot replace it in place, so the rebuild
//! requests a restart instead.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod loaders;
pub mod presentation;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use application::{
    CommitReport, LoadReport, RebuildPlan, RebuildUseCase, WatchEvent, WatchOptions,
    WatchOutcome, WatchUseCase,
};
pub use config::{Config, ConfigWarning};
pub use domain::entities::{ExtensionDescriptor, ExtensionLoadingContext, LoadingEffect};
pub use domain::ports::ExtensionLoader;
pub use error::{LoaderError, LoaderResult};
pub use loaders::{PrecompiledExtensionLoader, PrecompiledOptions};
pub use presentation::{ModuleHost, ProbeReport};
