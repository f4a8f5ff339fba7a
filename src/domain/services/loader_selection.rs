//! Ranking of competing loader claims

use std::cmp::Ordering;

use crate::domain::entities::ExtensionProbeEntry;

pub struct LoaderSelection;

impl LoaderSelection {
    /// Order candidates from most to least preferred.
    ///
    /// The most recently written binary wins; equal timestamps go to the
    /// loader with the lowest `order`, then to the loader name.
    pub fn rank(mut candidates: Vec<ExtensionProbeEntry>) -> Vec<ExtensionProbeEntry> {
        candidates.sort_by(Self::compare);
        candidates
    }

    fn compare(a: &ExtensionProbeEntry, b: &ExtensionProbeEntry) -> Ordering {
        b.last_write_time_utc
            .cmp(&a.last_write_time_utc)
            .then_with(|| a.loader.order.cmp(&b.loader.order))
            .then_with(|| a.loader.name.cmp(&b.loader.name))
    }
}
