//! Common test utilities for modhost scenario and CLI tests.
//!
//! This module provides:
//! - `TestEnv`: An isolated application root with helpers to lay out modules
//! - Assertion macros: `assert_stored!`, `assert_not_stored!`

#![allow(dead_code)]

pub mod assertions;
pub mod env;

pub use assertions::*;
pub use env::*;
