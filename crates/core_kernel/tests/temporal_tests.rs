//! Property tests for policy periods
//!
//! Covers end-date derivation from a duration and the `end > start`
//! invariant of `PolicyPeriod`.

use chrono::{Duration, NaiveDate};
use core_kernel::{end_date_for, PolicyPeriod, TemporalError};
use proptest::prelude::*;

fn start_date_strategy() -> impl Strategy<Value = NaiveDate> {
    // 2000-01-01 .. roughly 2060
    (0i64..22_000).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(offset)
    })
}

mod derivation {
    use super::*;

    proptest! {
        #[test]
        fn end_is_start_plus_duration(start in start_date_strategy(), days in 1u32..3650) {
            let end = end_date_for(start, days).unwrap();
            prop_assert_eq!((end - start).num_days(), i64::from(days));
            prop_assert!(end > start);
        }

        #[test]
        fn period_from_duration_matches_helper(start in start_date_strategy(), days in 1u32..3650) {
            let period = PolicyPeriod::from_duration(start, days).unwrap();
            prop_assert_eq!(period.start(), start);
            prop_assert_eq!(Some(period.end()), end_date_for(start, days));
            prop_assert_eq!(period.days(), i64::from(days));
        }
    }

    #[test]
    fn test_kasko_thirty_days() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(
            end_date_for(start, 30),
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[test]
    fn test_year_end_rollover() {
        let start = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
        assert_eq!(
            end_date_for(start, 365),
            NaiveDate::from_ymd_opt(2025, 12, 15)
        );
    }
}

mod invariants {
    use super::*;

    proptest! {
        #[test]
        fn non_increasing_periods_are_rejected(start in start_date_strategy(), back in 0i64..400) {
            let end = start - Duration::days(back);
            let is_invalid_period = matches!(
                PolicyPeriod::new(start, end),
                Err(TemporalError::InvalidPeriod { .. })
            );
            prop_assert!(is_invalid_period);
        }
    }

    #[test]
    fn test_out_of_range_duration() {
        let start = NaiveDate::MAX - Duration::days(1);
        assert!(matches!(
            PolicyPeriod::from_duration(start, 10),
            Err(TemporalError::OutOfRange { .. })
        ));
    }
}
