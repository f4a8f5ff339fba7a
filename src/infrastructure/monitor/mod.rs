//! Virtual Path Monitor Implementations

mod notify_monitor;

pub use notify_monitor::NotifyPathMonitor;
