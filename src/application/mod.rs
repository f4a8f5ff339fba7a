//! Application Layer
//!
//! Use cases that orchestrate the business flow.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain and the loaders)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `RebuildUseCase` - Plans and commits one catalog rebuild, loads and monitors the result
//! - `WatchUseCase` - Rebuilds whenever a monitored path changes

pub mod rebuild;
pub mod watch;

pub use rebuild::{
    CommitReport, LoadReport, RebuildPlan, RebuildUseCase, Selection, SkipReason, SkippedModule,
    LOCK_FILE_NAME,
};
pub use watch::{WatchEvent, WatchOptions, WatchOutcome, WatchUseCase, WatcherState, DEBOUNCE_MS};
