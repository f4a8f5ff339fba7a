//! VirtualPathMonitor port - push notification of file changes

use crate::domain::value_objects::ChangeToken;
use crate::error::LoaderResult;

pub trait VirtualPathMonitor: Send + Sync {
    /// Token invalidated the next time `virtual_path` changes
    fn when_path_changes(&self, virtual_path: &str) -> LoaderResult<ChangeToken>;
}
