//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod dependency_order;
mod loader_selection;
mod staleness;

pub use dependency_order::DependencyOrder;
pub use loader_selection::LoaderSelection;
pub use staleness::{CopyDecision, Staleness};
