//! AssemblyProbingFolder port - the cache of module binaries
//!
//! Binaries are never loaded from a module's own `bin` directory. They are
//! copied into the probing folder first, and loaded from there, so that a
//! module can be rebuilt while the host keeps running.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::domain::entities::LoadedAssembly;
use crate::error::LoaderResult;

/// A binary currently held by the probing folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredAssembly {
    pub name: String,
    pub path: PathBuf,
    pub last_write_time_utc: DateTime<Utc>,
    pub size: u64,
}

pub trait AssemblyProbingFolder: Send + Sync {
    fn assembly_exists(&self, name: &str) -> bool;

    /// Last write time of the stored copy, `None` when there is no copy
    fn get_assembly_date_time_utc(&self, name: &str) -> LoaderResult<Option<DateTime<Utc>>>;

    /// Copy `source` into the folder under `name`, replacing any older copy
    fn store_assembly(&self, name: &str, source: &Path) -> LoaderResult<()>;

    fn delete_assembly(&self, name: &str) -> LoaderResult<()>;

    /// Map the stored copy into the process. `None` when there is no copy;
    /// an error when the copy exists but is not a loadable binary.
    fn load_assembly(&self, name: &str) -> LoaderResult<Option<LoadedAssembly>>;

    /// Every binary in the folder, sorted by name
    fn list_assemblies(&self) -> LoaderResult<Vec<StoredAssembly>>;
}
