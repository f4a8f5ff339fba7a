//! Module Discovery

mod manifest;

pub use manifest::{ManifestDiscovery, ModuleManifest, MANIFEST_FILE_NAME};
