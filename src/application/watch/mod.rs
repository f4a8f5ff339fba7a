//! Watch Use Case
//!
//! Keeps the catalog in sync with the module folders:
//! - Change tokens from the loaders and the module folders
//! - Debouncing (250ms default)
//! - Rebuild, commit and load on every settled change
//! - Stop when a loaded binary would have to be replaced
//!
//! ## Usage
//!
//! ```ignore
//! let use_case = WatchUseCase::new(rebuild, folders, WatchOptions::default());
//! use_case.start(running, |event| { ... })?;
//! ```

mod event;
mod use_case;


pub use event::{WatchEvent, WatchOptions, WatcherState, DEBOUNCE_MS};
pub use use_case::{WatchOutcome, WatchUseCase};
