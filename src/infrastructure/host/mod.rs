//! Host Environment Implementations

mod loaded;
mod process_host;

pub use loaded::LoadedAssemblies;
pub use process_host::{ProcessHostEnvironment, RestartMarker};
