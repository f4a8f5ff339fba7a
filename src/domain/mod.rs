//! Domain Layer
//!
//! The decision logic of modhost, free of direct I/O.
//!
//! ## Structure
//!
//! - `entities/` - Descriptors, probe entries, the loading context
//! - `value_objects/` - Loader kinds, change tokens, virtual paths
//! - `services/` - Staleness, dependency order, loader ranking
//! - `ports/` - Interfaces implemented by the infrastructure layer
//!
//! All I/O goes through trait-defined ports.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
