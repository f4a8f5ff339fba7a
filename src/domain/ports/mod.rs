//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod dependencies_folder;
pub mod extension_folders;
pub mod extension_loader;
pub mod host_environment;
pub mod path_monitor;
pub mod probing_folder;
pub mod virtual_path_provider;

pub use dependencies_folder::DependenciesFolder;
pub use extension_folders::ExtensionFolders;
pub use extension_loader::ExtensionLoader;
pub use host_environment::HostEnvironment;
pub use path_monitor::VirtualPathMonitor;
pub use probing_folder::{AssemblyProbingFolder, StoredAssembly};
pub use virtual_path_provider::VirtualPathProvider;
