//! ExtensionFolders port - where modules come from

use crate::domain::entities::ExtensionDescriptor;
use crate::domain::value_objects::ChangeToken;
use crate::error::LoaderResult;

pub trait ExtensionFolders: Send + Sync {
    /// Descriptors of every module currently present
    fn available_extensions(&self) -> LoaderResult<Vec<ExtensionDescriptor>>;

    /// Register change tokens for the folders themselves, so that adding or
    /// removing a module is noticed
    fn monitor(&self, _register: &mut dyn FnMut(ChangeToken)) -> LoaderResult<()> {
        Ok(())
    }
}
