//! Registry of binaries mapped into this process
//!
//! Shared between the probing folder, which maps binaries, and the host
//! environment, which answers "is it loaded". Keeping the `LoadedAssembly`
//! here also keeps its library handle alive for the life of the process.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::entities::LoadedAssembly;

#[derive(Debug, Default)]
pub struct LoadedAssemblies {
    // keyed by lowercase name
    assemblies: Mutex<BTreeMap<String, LoadedAssembly>>,
}

impl LoadedAssemblies {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, LoadedAssembly>> {
        self.assemblies.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Remember a freshly mapped binary. The first mapping of a name wins.
    pub fn record(&self, assembly: LoadedAssembly) -> LoadedAssembly {
        self.lock()
            .entry(assembly.name.to_ascii_lowercase())
            .or_insert(assembly)
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<LoadedAssembly> {
        self.lock().get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains_key(&name.to_ascii_lowercase())
    }

    /// Names of all mapped binaries, as they were recorded
    pub fn names(&self) -> Vec<String> {
        self.lock().values().map(|a| a.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
