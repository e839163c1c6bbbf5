//! Property-based tests for invoice aggregation.
//!
//! - Selection succeeds exactly when every requested member is eligible
//! - A failed selection names precisely the ineligible ids
//! - The total is the exact sum of member amounts

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use staydesk_shared::types::TenantId;

use super::aggregation::fixtures::booking;
use super::aggregation::{AggregateByBookings, InvoiceAggregator};
use super::error::InvoiceError;
use crate::finance::PaymentType;

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_selection_is_all_or_nothing(
        members in proptest::collection::vec((arb_amount(), any::<bool>(), any::<bool>()), 1..8),
    ) {
        let tenant = TenantId::new();
        let agg = AggregateByBookings::new(PaymentType::OtaCollect);

        let bookings: Vec<_> = members
            .iter()
            .map(|(amount, invoiced, ota)| {
                let direction = if *ota { PaymentType::OtaCollect } else { PaymentType::HotelCollect };
                let mut b = booking(tenant, *amount, direction);
                b.is_invoiced = *invoiced;
                b
            })
            .collect();
        let ids: Vec<_> = bookings.iter().map(|b| b.id).collect();
        let mut failing: Vec<Uuid> = bookings
            .iter()
            .filter(|b| !agg.is_eligible(b))
            .map(|b| b.id.into())
            .collect();
        failing.sort();
        let expected_total: Decimal = bookings.iter().map(|b| b.total_amount).sum();

        match agg.select(&ids, bookings) {
            Ok(selected) => {
                prop_assert!(failing.is_empty());
                prop_assert_eq!(selected.len(), ids.len());
                prop_assert_eq!(agg.total(&selected).unwrap(), expected_total);
            }
            Err(InvoiceError::MembersNotFound { ids: reported }) => {
                prop_assert_eq!(reported, failing);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}
