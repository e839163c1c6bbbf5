//! Integration tests for payment recording.
//!
//! These tests verify that:
//! - Channel remittances cannot predate check-out
//! - Direction-specific fields are required and exclusive
//! - Collectors must be active members of the booking's tenant
//! - Invoiced payments keep their amount and cannot be removed
//! - Only a super admin removes payments

mod common;

use rust_decimal_macros::dec;

use staydesk_core::audit::AuditAction;
use staydesk_core::finance::{PaymentMethod, PaymentType};
use staydesk_core::invoice::CreateFromPaymentsInput;
use staydesk_core::payment::{PaymentError, PaymentStatus, UpdatePaymentInput};
use staydesk_shared::types::UserId;
use staydesk_shared::{Actor, AppError};

use common::{TestEnv, hotel_payment, ota_payment};

#[tokio::test]
async fn test_ota_payment_must_not_predate_checkout() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::OtaCollect, dec!(300))
        .await;

    let early = booking.check_out.pred_opt().unwrap();
    let err = env
        .payments
        .create(&t.admin, ota_payment(&booking, early, dec!(270)))
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::PaymentDateBeforeCheckout { .. }));
    assert!(matches!(AppError::from(err), AppError::BadRequest(_)));

    let late = booking.check_out.succ_opt().unwrap();
    let payment = env
        .payments
        .create(&t.admin, ota_payment(&booking, late, dec!(270)))
        .await
        .unwrap();
    assert_eq!(payment.payment_type, PaymentType::OtaCollect);
    assert_eq!(payment.received_from.as_deref(), Some("Booking.com"));
    assert_eq!(payment.collected_by_id, None);
    assert_eq!(payment.status, PaymentStatus::Completed);
}

#[tokio::test]
async fn test_hotel_payment_requires_collector() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;

    let mut input = hotel_payment(&booking, t.staff.id, dec!(100));
    input.collected_by_id = None;
    let err = env.payments.create(&t.admin, input).await.unwrap_err();

    assert!(matches!(
        err,
        PaymentError::MissingField {
            field: "collectedById",
            ..
        }
    ));
    assert!(err.to_string().contains("collectedById"));
}

#[tokio::test]
async fn test_direction_fields_are_exclusive() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;

    let mut input = hotel_payment(&booking, t.staff.id, dec!(100));
    input.received_from = Some("Expedia".to_string());
    let err = env.payments.create(&t.admin, input).await.unwrap_err();
    assert!(matches!(
        err,
        PaymentError::FieldNotAllowed {
            field: "receivedFrom",
            ..
        }
    ));

    let mut input = ota_payment(&booking, booking.check_out, dec!(100));
    input.collected_by_id = Some(t.staff.id);
    let err = env.payments.create(&t.admin, input).await.unwrap_err();
    assert!(matches!(
        err,
        PaymentError::FieldNotAllowed {
            field: "collectedById",
            ..
        }
    ));
}

#[tokio::test]
async fn test_collector_must_be_active_tenant_member() {
    let env = TestEnv::new();
    let a = env.seed_tenant("Coral").await;
    let b = env.seed_tenant("Dune").await;
    let booking = env
        .book(&a, &a.managed, PaymentType::HotelCollect, dec!(300))
        .await;

    let foreign = hotel_payment(&booking, b.staff.id, dec!(100));
    let err = env.payments.create(&a.admin, foreign).await.unwrap_err();
    assert!(matches!(err, PaymentError::CollectorNotFound(id) if id == b.staff.id));

    let former = env.seed_inactive_user(a.tenant_id).await;
    let inactive = hotel_payment(&booking, former, dec!(100));
    let err = env.payments.create(&a.admin, inactive).await.unwrap_err();
    assert!(matches!(AppError::from(err), AppError::NotFound(_)));
}

#[tokio::test]
async fn test_method_must_fit_direction() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::OtaCollect, dec!(300))
        .await;

    let mut input = ota_payment(&booking, booking.check_out, dec!(100));
    input.method = PaymentMethod::Cash;
    let err = env.payments.create(&t.admin, input).await.unwrap_err();
    assert!(matches!(err, PaymentError::MethodNotAllowed { .. }));

    let mut input = ota_payment(&booking, booking.check_out, dec!(100));
    input.method = PaymentMethod::VirtualCard;
    assert!(env.payments.create(&t.admin, input).await.is_ok());
}

#[tokio::test]
async fn test_amount_must_be_positive() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;

    let input = hotel_payment(&booking, t.staff.id, dec!(0));
    let err = env.payments.create(&t.admin, input).await.unwrap_err();
    assert!(matches!(err, PaymentError::NonPositiveAmount));
}

#[tokio::test]
async fn test_payment_for_foreign_booking_is_not_found() {
    let env = TestEnv::new();
    let a = env.seed_tenant("Coral").await;
    let b = env.seed_tenant("Dune").await;
    let booking = env
        .book(&b, &b.managed, PaymentType::HotelCollect, dec!(300))
        .await;

    let input = hotel_payment(&booking, a.staff.id, dec!(100));
    let err = env.payments.create(&a.admin, input).await.unwrap_err();
    assert!(matches!(err, PaymentError::BookingNotFound(id) if id == booking.id));
}

#[tokio::test]
async fn test_partner_reads_payments_of_owned_property_only() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;
    let payment = env.pay(&t, &booking, dec!(100)).await;

    assert!(env.payments.find_one(&t.manager, payment.id).await.is_ok());
    let err = env
        .payments
        .find_one(&t.partner, payment.id)
        .await
        .unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Forbidden(_)));

    let listed = env
        .payments
        .list_for_booking(&t.manager, booking.id)
        .await
        .unwrap();
    assert_eq!(listed, vec![payment]);
}

#[tokio::test]
async fn test_update_rechecks_payment_rules() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::OtaCollect, dec!(300))
        .await;
    let payment = env
        .payments
        .create(
            &t.admin,
            ota_payment(&booking, booking.check_out, dec!(270)),
        )
        .await
        .unwrap();

    let backdate = UpdatePaymentInput {
        payment_date: booking.check_in.pred_opt(),
        ..Default::default()
    };
    let err = env
        .payments
        .update(&t.admin, payment.id, backdate)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::PaymentDateBeforeCheckout { .. }));

    let fix = UpdatePaymentInput {
        amount: Some(dec!(265.50)),
        reference: Some("REM-002".to_string()),
        ..Default::default()
    };
    let updated = env
        .payments
        .update(&t.admin, payment.id, fix)
        .await
        .unwrap();
    assert_eq!(updated.amount, dec!(265.50));
    assert_eq!(updated.reference.as_deref(), Some("REM-002"));
    assert_eq!(
        env.audit.actions_for(payment.id),
        vec![AuditAction::Create, AuditAction::Update]
    );
}

#[tokio::test]
async fn test_invoiced_payment_is_frozen() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;
    let payment = env.pay(&t, &booking, dec!(100)).await;
    env.invoices
        .create_from_payments(
            &t.admin,
            CreateFromPaymentsInput {
                payment_ids: vec![payment.id],
                notes: None,
            },
        )
        .await
        .unwrap();

    let patch = UpdatePaymentInput {
        amount: Some(dec!(90)),
        ..Default::default()
    };
    let err = env
        .payments
        .update(&t.admin, payment.id, patch)
        .await
        .unwrap_err();
    assert!(matches!(err, PaymentError::PaymentInvoiced(id) if id == payment.id));

    let notes_only = UpdatePaymentInput {
        notes: Some("receipt reprinted".to_string()),
        ..Default::default()
    };
    assert!(env.payments.update(&t.admin, payment.id, notes_only).await.is_ok());

    let root = Actor::super_admin(UserId::new());
    let err = env.payments.remove(&root, payment.id).await.unwrap_err();
    assert!(matches!(err, PaymentError::PaymentInvoiced(_)));
}

#[tokio::test]
async fn test_only_super_admin_removes_payments() {
    let env = TestEnv::new();
    let t = env.seed_tenant("Coral").await;
    let booking = env
        .book(&t, &t.managed, PaymentType::HotelCollect, dec!(300))
        .await;
    let payment = env.pay(&t, &booking, dec!(100)).await;

    let err = env.payments.remove(&t.admin, payment.id).await.unwrap_err();
    assert!(matches!(AppError::from(err), AppError::Forbidden(_)));

    let root = Actor::super_admin(UserId::new());
    env.payments.remove(&root, payment.id).await.unwrap();
    assert!(env.store.payment(payment.id).await.is_none());
    assert_eq!(
        env.audit.actions_for(payment.id),
        vec![AuditAction::Create, AuditAction::Delete]
    );
}
