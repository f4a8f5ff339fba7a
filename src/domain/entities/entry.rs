//! Probe results and loaded extensions

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ExtensionDescriptor;
use crate::domain::value_objects::{AssemblyIdentity, LoaderInfo};

/// Keep-alive handle for a binary mapped into the process
///
/// Dropping the last clone would unmap the library; the host keeps one per
/// loaded assembly for the lifetime of the process.
pub type AssemblyHandle = Arc<dyn Any + Send + Sync>;

/// A binary loaded from the probing folder
#[derive(Clone)]
pub struct LoadedAssembly {
    pub name: String,
    pub identity: AssemblyIdentity,
    /// Physical path the binary was mapped from
    pub location: PathBuf,
    pub exported_types: Vec<String>,
    pub handle: Option<AssemblyHandle>,
}

impl LoadedAssembly {
    /// Full display name, e.g. `Foo, sha256=3f2a9c01d4e7`
    pub fn full_name(&self) -> String {
        self.identity.to_string()
    }
}

impl fmt::Debug for LoadedAssembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedAssembly")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("location", &self.location)
            .field("exported_types", &self.exported_types)
            .field("mapped", &self.handle.is_some())
            .finish()
    }
}

/// A successfully loaded module
#[derive(Debug, Clone)]
pub struct ExtensionEntry {
    pub descriptor: ExtensionDescriptor,
    pub assembly: LoadedAssembly,
    pub exported_types: Vec<String>,
}

/// A loader's claim that it can load a module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionProbeEntry {
    pub descriptor: ExtensionDescriptor,
    pub loader: LoaderInfo,
    pub virtual_path: String,
    pub last_write_time_utc: DateTime<Utc>,
}

/// A loader's claim on an auxiliary binary shipped with a module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionReferenceProbeEntry {
    pub descriptor: ExtensionDescriptor,
    pub loader: LoaderInfo,
    pub name: String,
    pub virtual_path: Option<String>,
}
