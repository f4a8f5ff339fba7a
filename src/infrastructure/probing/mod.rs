//! Assembly Probing Folder Implementations

mod local_folder;

pub use local_folder::{LocalProbingFolder, EXPORTED_TYPES_SYMBOL};
