//! Loader Kind Value Object
//!
//! Each extension loader strategy declares what kind of binaries it
//! produces. The compatibility rules between modules depend on this tag,
//! never on the concrete loader type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of loader strategies known to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoaderKind {
    /// Modules compiled into the host itself
    Core,
    /// Modules whose binary is already referenced by the host application
    Referenced,
    /// Modules shipped with a prebuilt binary in their `bin` directory
    Precompiled,
    /// Modules compiled on the fly by the host; a new identity per rebuild
    Dynamic,
}

impl LoaderKind {
    /// Stable loader name, recorded in the dependencies file
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Core => "core",
            LoaderKind::Referenced => "referenced",
            LoaderKind::Precompiled => "precompiled",
            LoaderKind::Dynamic => "dynamic",
        }
    }

    /// Binaries produced by this loader change identity on every rebuild
    pub fn is_dynamically_compiled(&self) -> bool {
        matches!(self, LoaderKind::Dynamic)
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a loader as carried by probe entries
///
/// Lower `order` means higher priority when two loaders claim the same
/// module with the same timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LoaderInfo {
    pub name: String,
    pub kind: LoaderKind,
    pub order: i32,
}

impl LoaderInfo {
    pub fn new(name: impl Into<String>, kind: LoaderKind, order: i32) -> Self {
        Self {
            name: name.into(),
            kind,
            order,
        }
    }

    pub fn is_dynamically_compiled(&self) -> bool {
        self.kind.is_dynamically_compiled()
    }
}
