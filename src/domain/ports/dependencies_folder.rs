//! DependenciesFolder port - what the last committed rebuild decided
//!
//! Lets the next rebuild notice that a module switched loaders or
//! disappeared, which is when stored binaries have to be deleted.

use crate::domain::entities::DependencyDescriptor;
use crate::error::LoaderResult;

pub trait DependenciesFolder: Send + Sync {
    /// Descriptor recorded for one module
    fn get_descriptor(&self, module_name: &str) -> LoaderResult<Option<DependencyDescriptor>> {
        Ok(self
            .load_descriptors()?
            .into_iter()
            .find(|d| d.name.eq_ignore_ascii_case(module_name)))
    }

    /// All descriptors recorded by the last commit
    fn load_descriptors(&self) -> LoaderResult<Vec<DependencyDescriptor>>;

    /// Replace the recorded descriptors
    fn store_descriptors(&self, descriptors: &[DependencyDescriptor]) -> LoaderResult<()>;
}
