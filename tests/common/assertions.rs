//! Custom assertion macros for scenario and CLI tests.
//!
//! These macros provide descriptive failure messages to aid debugging.

use std::path::Path;

/// List all files in a directory recursively (for debugging)
pub fn list_all_files(dir: &Path) -> Vec<String> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(list_all_files(&path));
            } else {
                files.push(path.display().to_string());
            }
        }
    }
    files.sort();
    files
}

/// Assert that the probing folder holds a copy of `name`.
///
/// # Example
/// ```ignore
/// assert_stored!(env, "Foo");
/// ```
#[macro_export]
macro_rules! assert_stored {
    ($env:expr, $name:expr) => {
        let stored = $env.stored($name);
        assert!(
            stored.is_file(),
            "Expected '{}' in the probing folder at {:?}.\nFiles found:\n  {}",
            $name,
            stored,
            $crate::common::list_all_files($env.app_root.path()).join("\n  ")
        );
    };
}

/// Assert that the probing folder holds no copy of `name`.
#[macro_export]
macro_rules! assert_not_stored {
    ($env:expr, $name:expr) => {
        let stored = $env.stored($name);
        assert!(
            !stored.exists(),
            "Expected no '{}' in the probing folder, but {:?} exists",
            $name,
            stored
        );
    };
}
