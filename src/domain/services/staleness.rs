//! Staleness decision for stored binaries
//!
//! Pure domain logic: compares the timestamp of a module's source binary
//! with the copy held by the probing folder.

use chrono::{DateTime, Duration, Utc};

/// Outcome of comparing a source binary with its stored copy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyDecision {
    /// No stored copy yet
    Missing,
    /// Source is newer than the stored copy
    Stale,
    /// Stored copy is up to date
    UpToDate,
}

impl CopyDecision {
    pub fn needs_copy(&self) -> bool {
        !matches!(self, CopyDecision::UpToDate)
    }
}

/// Staleness policy
///
/// With the default zero tolerance, a copy is stale only when the source is
/// strictly newer. A tolerance absorbs coarse file system timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    tolerance: Duration,
}

impl Default for Staleness {
    fn default() -> Self {
        Self::exact()
    }
}

impl Staleness {
    pub fn exact() -> Self {
        Self {
            tolerance: Duration::zero(),
        }
    }

    pub fn with_tolerance(tolerance: Duration) -> Self {
        Self {
            tolerance: tolerance.max(Duration::zero()),
        }
    }

    pub fn tolerance(&self) -> Duration {
        self.tolerance
    }

    pub fn decide(&self, source: DateTime<Utc>, stored: Option<DateTime<Utc>>) -> CopyDecision {
        match stored {
            None => CopyDecision::Missing,
            Some(stored) if source > stored + self.tolerance => CopyDecision::Stale,
            Some(_) => CopyDecision::UpToDate,
        }
    }
}
