//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod assembly_identity;
mod change_token;
mod loader_kind;
pub mod virtual_path;

pub use assembly_identity::AssemblyIdentity;
pub use change_token::{ChangeToken, WeakChangeToken};
pub use loader_kind::{LoaderInfo, LoaderKind};
