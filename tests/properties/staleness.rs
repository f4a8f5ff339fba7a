//! Property tests for the staleness decision.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use modhost::domain::services::{CopyDecision, Staleness};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: With no stored copy a copy is always needed.
    #[test]
    fn property_missing_copy_always_copies(
        source in 0i64..4_000_000_000,
        tolerance in 0i64..100_000,
    ) {
        let staleness = Staleness::with_tolerance(Duration::milliseconds(tolerance));
        let source = Utc.timestamp_opt(source, 0).unwrap();
        prop_assert_eq!(staleness.decide(source, None), CopyDecision::Missing);
    }

    /// PROPERTY: Exact staleness copies iff the source is strictly newer.
    #[test]
    fn property_exact_is_strictly_newer(
        source in 0i64..4_000_000_000,
        stored in 0i64..4_000_000_000,
    ) {
        let source_time = Utc.timestamp_opt(source, 0).unwrap();
        let stored_time = Utc.timestamp_opt(stored, 0).unwrap();
        let decision = Staleness::exact().decide(source_time, Some(stored_time));
        prop_assert_eq!(decision.needs_copy(), source > stored);
    }

    /// PROPERTY: A larger tolerance never asks for more copies.
    #[test]
    fn property_tolerance_is_monotonic(
        source in 0i64..1_000_000,
        stored in 0i64..1_000_000,
        small in 0i64..10_000,
        extra in 0i64..10_000,
    ) {
        let source_time = Utc.timestamp_opt(source, 0).unwrap();
        let stored_time = Some(Utc.timestamp_opt(stored, 0).unwrap());
        let strict = Staleness::with_tolerance(Duration::milliseconds(small));
        let lenient = Staleness::with_tolerance(Duration::milliseconds(small + extra));
        if lenient.decide(source_time, stored_time).needs_copy() {
            prop_assert!(strict.decide(source_time, stored_time).needs_copy());
        }
    }
}
