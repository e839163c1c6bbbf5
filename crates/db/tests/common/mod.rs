//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use staydesk_core::access::AccessEvaluator;
use staydesk_core::booking::{Booking, BookingService, CreateBookingInput};
use staydesk_core::finance::{PaymentMethod, PaymentType};
use staydesk_core::invoice::{InvoiceNumberGenerator, InvoiceService};
use staydesk_core::payment::{CreatePaymentInput, Payment, PaymentService};
use staydesk_core::tenancy::{Property, RoomType, Tenant, User};
use staydesk_db::{MemoryAuditSink, MemoryStore};
use staydesk_shared::types::{PropertyId, RoomTypeId, TenantId, UserId};
use staydesk_shared::{Actor, Role};

/// Services wired to one in-memory store.
pub struct TestEnv {
    pub store: Arc<MemoryStore>,
    pub audit: MemoryAuditSink,
    pub bookings: BookingService<MemoryStore>,
    pub payments: PaymentService<MemoryStore>,
    pub invoices: InvoiceService<MemoryStore>,
}

impl TestEnv {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let access = Arc::new(AccessEvaluator::standard());
        let audit = MemoryAuditSink::new();
        let sink: Arc<MemoryAuditSink> = Arc::new(audit.clone());

        Self {
            bookings: BookingService::new(Arc::clone(&store), Arc::clone(&access), sink.clone()),
            payments: PaymentService::new(Arc::clone(&store), Arc::clone(&access), sink.clone()),
            invoices: InvoiceService::new(Arc::clone(&store), access, sink),
            store,
            audit,
        }
    }

    /// Replaces the invoice number source.
    pub fn with_numbers(mut self, numbers: Arc<dyn InvoiceNumberGenerator>) -> Self {
        self.invoices = self.invoices.with_number_generator(numbers);
        self
    }

    /// Seeds a tenant with one user per role and two properties.
    ///
    /// `managed` is owned by the manager, `partnered` by the partner.
    pub async fn seed_tenant(&self, name: &str) -> TenantFixture {
        let tenant_id = TenantId::new();
        self.store
            .insert_tenant(Tenant {
                id: tenant_id,
                name: name.to_string(),
                created_at: Utc::now(),
            })
            .await;

        let admin = self.seed_user(tenant_id, Role::Admin, "admin").await;
        let manager = self.seed_user(tenant_id, Role::Manager, "manager").await;
        let partner = self.seed_user(tenant_id, Role::Partner, "partner").await;
        let staff = self.seed_user(tenant_id, Role::Staff, "staff").await;

        let managed = self
            .seed_property(tenant_id, Some(manager.id), &format!("{name} Seaside"))
            .await;
        let partnered = self
            .seed_property(tenant_id, Some(partner.id), &format!("{name} Hillview"))
            .await;

        TenantFixture {
            tenant_id,
            admin,
            manager,
            partner,
            staff,
            managed,
            partnered,
        }
    }

    async fn seed_user(&self, tenant_id: TenantId, role: Role, label: &str) -> Actor {
        let id = UserId::new();
        self.store
            .insert_user(User {
                id,
                tenant_id: Some(tenant_id),
                role,
                full_name: format!("Test {label}"),
                email: format!("{label}-{id}@example.com"),
                is_active: true,
            })
            .await;
        Actor::new(id, tenant_id, role)
    }

    /// Seeds an inactive desk user.
    pub async fn seed_inactive_user(&self, tenant_id: TenantId) -> UserId {
        let id = UserId::new();
        self.store
            .insert_user(User {
                id,
                tenant_id: Some(tenant_id),
                role: Role::Staff,
                full_name: "Former employee".to_string(),
                email: format!("former-{id}@example.com"),
                is_active: false,
            })
            .await;
        id
    }

    async fn seed_property(
        &self,
        tenant_id: TenantId,
        owner_id: Option<UserId>,
        name: &str,
    ) -> PropertyFixture {
        let property = Property {
            id: PropertyId::new(),
            tenant_id,
            owner_id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        let room_type = RoomType {
            id: RoomTypeId::new(),
            tenant_id,
            property_id: property.id,
            name: "Deluxe".to_string(),
            base_rate: Decimal::new(100, 0),
        };
        self.store.insert_property(property.clone()).await;
        self.store.insert_room_type(room_type.clone()).await;
        PropertyFixture {
            property,
            room_type,
        }
    }

    /// Creates a booking as the tenant admin.
    pub async fn book(
        &self,
        fixture: &TenantFixture,
        place: &PropertyFixture,
        payment_type: PaymentType,
        total: Decimal,
    ) -> Booking {
        self.bookings
            .create(&fixture.admin, booking_input(place, payment_type, total))
            .await
            .expect("booking should be created")
    }

    /// Records a hotel-collected cash payment as the tenant admin.
    pub async fn pay(&self, fixture: &TenantFixture, booking: &Booking, amount: Decimal) -> Payment {
        self.payments
            .create(
                &fixture.admin,
                hotel_payment(booking, fixture.staff.id, amount),
            )
            .await
            .expect("payment should be recorded")
    }
}

/// A tenant with one actor per role.
pub struct TenantFixture {
    pub tenant_id: TenantId,
    pub admin: Actor,
    pub manager: Actor,
    pub partner: Actor,
    pub staff: Actor,
    pub managed: PropertyFixture,
    pub partnered: PropertyFixture,
}

/// A property with one room type.
#[derive(Clone)]
pub struct PropertyFixture {
    pub property: Property,
    pub room_type: RoomType,
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Three nights, 10 to 13 March 2026.
pub fn booking_input(
    place: &PropertyFixture,
    payment_type: PaymentType,
    total: Decimal,
) -> CreateBookingInput {
    CreateBookingInput {
        property_id: place.property.id,
        room_type_id: place.room_type.id,
        guest_name: "Asha Rao".to_string(),
        guest_email: Some("asha@example.com".to_string()),
        guest_phone: None,
        channel: None,
        check_in: date(2026, 3, 10),
        check_out: date(2026, 3, 13),
        adults: 2,
        children: 0,
        total_amount: total,
        commission: None,
        amount_paid: None,
        payment_method: None,
        payment_type,
        status: None,
        notes: None,
    }
}

/// Cash collected at the desk on the check-out date.
pub fn hotel_payment(booking: &Booking, collector: UserId, amount: Decimal) -> CreatePaymentInput {
    CreatePaymentInput {
        booking_id: booking.id,
        payment_type: PaymentType::HotelCollect,
        method: PaymentMethod::Cash,
        amount,
        payment_date: booking.check_out,
        status: None,
        collected_by_id: Some(collector),
        received_from: None,
        reference: None,
        notes: None,
    }
}

/// Channel remittance by bank transfer.
pub fn ota_payment(booking: &Booking, payment_date: NaiveDate, amount: Decimal) -> CreatePaymentInput {
    CreatePaymentInput {
        booking_id: booking.id,
        payment_type: PaymentType::OtaCollect,
        method: PaymentMethod::BankTransfer,
        amount,
        payment_date,
        status: None,
        collected_by_id: None,
        received_from: Some("Booking.com".to_string()),
        reference: Some("REM-001".to_string()),
        notes: None,
    }
}

/// Always produces the same invoice number.
#[derive(Debug)]
pub struct FixedNumber(pub &'static str);

impl InvoiceNumberGenerator for FixedNumber {
    fn generate(&self, _prefix: &str, _date: NaiveDate, _suffix_length: usize) -> String {
        self.0.to_string()
    }
}
