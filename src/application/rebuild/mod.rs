//! Rebuild Use Case
//!
//! One catalog rebuild, as a decide phase and an apply phase:
//!
//! 1. `plan` - order modules by dependency, probe every loader, select a
//!    winner per module and run the lifecycle callbacks into an
//!    `ExtensionLoadingContext`
//! 2. `commit` - under the probing folder lock, delete, copy, record the
//!    dependencies and request a restart if any callback asked for one
//! 3. `load` / `monitor` - map the winners and watch what they depend on

mod outcome;
mod use_case;


pub use outcome::{CommitReport, LoadReport, RebuildPlan, Selection, SkipReason, SkippedModule};
pub use use_case::{RebuildUseCase, LOCK_FILE_NAME};
