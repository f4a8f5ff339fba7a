//! Repository Implementations

mod dependencies;

pub use dependencies::{parse_dependencies, TomlDependenciesFolder, DEPENDENCIES_FORMAT_VERSION};
