//! Property-based tests for booking date validation.
//!
//! - Any stay with check-out after check-in is accepted
//! - Any stay with check-out on or before check-in is rejected

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use super::error::BookingError;
use super::validation::validate_dates;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap() + Duration::days(offset)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_forward_stays_accepted(check_in in arb_date(), stay in 1i64..365i64) {
        prop_assert!(validate_dates(check_in, check_in + Duration::days(stay)).is_ok());
    }

    #[test]
    fn prop_backward_or_empty_stays_rejected(check_in in arb_date(), back in 0i64..365i64) {
        let result = validate_dates(check_in, check_in - Duration::days(back));
        let is_invalid_dates = matches!(result, Err(BookingError::InvalidDates { .. }));
        prop_assert!(is_invalid_dates);
    }
}
