//! Presentation Layer
//!
//! This layer handles:
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `factory` - `ModuleHost`, the composition root built from a `Config`
//! - `output` - Text renderers and JSON views of command results
//!
//! ## Usage
//!
//! ```ignore
//! use modhost::{Config, ModuleHost};
//!
//! let host = ModuleHost::new(Config::default(), "/srv/site")?;
//! let modules = host.discover()?;
//! let (plan, report) = host.rebuild_use_case().rebuild(&modules)?;
//! ```

pub mod factory;
pub mod output;

pub use factory::{ModuleHost, ProbeReport};
pub use output::{command_json, LoadReportView, OutputFormat, TextRenderer};
