//! Property-based tests for FinancialCalculator.
//!
//! - Nights equal the calendar-day difference
//! - Net revenue plus commission reproduces the total exactly
//! - Outstanding balance follows the collection direction

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calculator::FinancialCalculator;
use super::types::{FinancialInputs, PaymentType};

/// Strategy for generating amounts with cent precision (0.00 to 100,000.00).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for generating dates in a ten-year window.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650i64).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    })
}

fn arb_payment_type() -> impl Strategy<Value = PaymentType> {
    prop_oneof![Just(PaymentType::HotelCollect), Just(PaymentType::OtaCollect)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any stay of N days yields exactly N nights.
    #[test]
    fn prop_nights_match_calendar_days(
        check_in in arb_date(),
        stay in 1i64..400i64,
    ) {
        let check_out = check_in + Duration::days(stay);
        prop_assert_eq!(FinancialCalculator::nights(check_in, check_out), stay);
    }

    /// net_revenue + commission == total, with no rounding loss.
    #[test]
    fn prop_net_revenue_is_exact(
        total in arb_amount(),
        commission in proptest::option::of(arb_amount()),
    ) {
        let net = FinancialCalculator::net_revenue(total, commission).unwrap();
        prop_assert_eq!(net + commission.unwrap_or(Decimal::ZERO), total);
        // Repeated derivation is stable
        prop_assert_eq!(FinancialCalculator::net_revenue(total, commission).unwrap(), net);
    }

    /// The channel-collected balance is the direct balance less commission.
    #[test]
    fn prop_outstanding_direction_rule(
        total in arb_amount(),
        commission in arb_amount(),
        paid in arb_amount(),
    ) {
        let net = FinancialCalculator::net_revenue(total, Some(commission)).unwrap();
        let hotel = FinancialCalculator::outstanding_balance(total, paid, net, PaymentType::HotelCollect).unwrap();
        let ota = FinancialCalculator::outstanding_balance(total, paid, net, PaymentType::OtaCollect).unwrap();

        prop_assert_eq!(hotel, total - paid);
        prop_assert_eq!(ota, net - paid);
        prop_assert_eq!(hotel - ota, commission);
    }

    /// derive() agrees with the individual functions.
    #[test]
    fn prop_derive_is_consistent(
        check_in in arb_date(),
        stay in 1i64..60i64,
        total in arb_amount(),
        commission in proptest::option::of(arb_amount()),
        paid in arb_amount(),
        payment_type in arb_payment_type(),
    ) {
        let inputs = FinancialInputs {
            check_in,
            check_out: check_in + Duration::days(stay),
            total_amount: total,
            commission,
            amount_paid: paid,
            payment_type,
        };
        let figures = FinancialCalculator::derive(&inputs).unwrap();
        let net = FinancialCalculator::net_revenue(total, commission).unwrap();

        prop_assert_eq!(figures.nights, stay);
        prop_assert_eq!(figures.net_revenue, net);
        prop_assert_eq!(
            figures.outstanding_balance,
            FinancialCalculator::outstanding_balance(total, paid, net, payment_type).unwrap()
        );
    }
}
