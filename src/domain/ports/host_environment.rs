//! HostEnvironment port - what the running process has already loaded
//!
//! A binary mapped into the process cannot be unmapped without tearing the
//! process down. Loaders ask this port on every decision instead of
//! caching the answer, since the set grows between rebuilds.

use crate::error::LoaderResult;

pub trait HostEnvironment: Send + Sync {
    /// Whether a binary with this name is mapped into the process
    fn is_assembly_loaded(&self, name: &str) -> bool;

    /// Ask for the hosting process to be torn down and started again
    fn restart_app_domain(&self, reasons: &[String]) -> LoaderResult<()>;
}
