//! VirtualPathProvider port - resolution of application-relative paths
//!
//! Module locations are expressed as virtual paths (`~/Modules/Foo`). This
//! port maps them onto the physical file system and answers the few
//! questions the loaders ask about them.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::domain::value_objects::virtual_path;
use crate::error::LoaderResult;

/// Abstract virtual path resolution
///
/// Implementations:
/// - `LocalVirtualPathProvider` - maps `~/` onto an application root
/// - in-memory fakes in tests
pub trait VirtualPathProvider: Send + Sync {
    /// Physical location of a virtual path
    fn map_path(&self, virtual_path: &str) -> PathBuf;

    /// Join segments into a virtual path
    fn combine(&self, segments: &[&str]) -> String {
        virtual_path::combine(segments)
    }

    /// Directory part of a virtual path
    fn get_directory_name(&self, virtual_path: &str) -> String {
        virtual_path::directory_name(virtual_path).to_string()
    }

    fn file_exists(&self, virtual_path: &str) -> bool;

    fn directory_exists(&self, virtual_path: &str) -> bool;

    /// Virtual paths of the files directly inside a directory
    fn list_files(&self, virtual_path: &str) -> LoaderResult<Vec<String>>;

    /// Virtual paths of the directories directly inside a directory
    fn list_directories(&self, virtual_path: &str) -> LoaderResult<Vec<String>>;

    fn get_file_last_write_time_utc(&self, virtual_path: &str) -> LoaderResult<DateTime<Utc>>;
}
