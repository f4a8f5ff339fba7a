//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Virtual path resolution on the local disk
//! - `probing/` - The probing folder and binary mapping (`libloading`)
//! - `host/` - The running process as host environment
//! - `monitor/` - Change tokens driven by `notify`
//! - `repositories/` - The dependencies file (TOML)
//! - `discovery/` - `module.toml` manifests

pub mod discovery;
pub mod fs;
pub mod host;
pub mod monitor;
pub mod probing;
pub mod repositories;

// Re-export for convenience
pub use discovery::ManifestDiscovery;
pub use fs::LocalVirtualPathProvider;
pub use host::{LoadedAssemblies, ProcessHostEnvironment};
pub use monitor::NotifyPathMonitor;
pub use probing::LocalProbingFolder;
pub use repositories::TomlDependenciesFolder;
