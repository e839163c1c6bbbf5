//! Demo seeder for Staydesk development.
//!
//! Seeds a demo tenant into an in-memory store and walks a stay through its
//! whole lifecycle: booking, check-in and check-out, payments, invoicing,
//! and invoice cancellation. Every step is logged, audit events included.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use staydesk_core::access::AccessEvaluator;
use staydesk_core::audit::{AuditSink, TracingAuditSink};
use staydesk_core::booking::{
    BookingOptions, BookingService, BookingStatus, CreateBookingInput, UpdateBookingInput,
};
use staydesk_core::finance::{PaymentMethod, PaymentType};
use staydesk_core::invoice::{
    CreateFromBookingsInput, CreateFromPaymentsInput, InvoiceFilter, InvoiceOptions,
    InvoiceService, InvoiceStatus,
};
use staydesk_core::payment::{CreatePaymentInput, PaymentService};
use staydesk_core::tenancy::{Property, RoomType, Tenant, User};
use staydesk_db::MemoryStore;
use staydesk_shared::types::{
    PageRequest, PropertyId, RoomTypeId, TenantId, UserId, parse_amount, parse_optional_amount,
};
use staydesk_shared::{Actor, AppConfig, LoggingConfig, Role};

/// The seeded demo tenant.
struct DemoTenant {
    tenant_id: TenantId,
    manager: Actor,
    front_desk: Actor,
    property: Property,
    room_type: RoomType,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let store = Arc::new(MemoryStore::new());
    let access = Arc::new(AccessEvaluator::standard());
    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);

    let bookings = BookingService::new(Arc::clone(&store), Arc::clone(&access), Arc::clone(&audit))
        .with_options(BookingOptions::from(&config.booking));
    let payments = PaymentService::new(Arc::clone(&store), Arc::clone(&access), Arc::clone(&audit));
    let invoices = InvoiceService::new(Arc::clone(&store), access, audit)
        .with_options(InvoiceOptions::from(&config.invoice));

    let demo = seed_demo_tenant(&store).await;
    info!(tenant_id = %demo.tenant_id, property = %demo.property.name, "Seeded demo tenant");

    let today = Utc::now().date_naive();
    let check_in = today
        .checked_sub_days(Days::new(5))
        .context("check-in date out of range")?;
    let check_out = today
        .checked_sub_days(Days::new(2))
        .context("check-out date out of range")?;

    // Two channel bookings and one walk-in.
    let mut stays = Vec::new();
    for (guest, total, commission) in [
        ("Asha Rao", "360.00", Some("54.00")),
        ("Tomas Berg", "240.00", Some("36.00")),
        ("Mei Lin", "300.00", None),
    ] {
        let total = parse_amount("totalAmount", total)?;
        let commission = parse_optional_amount("commission", commission)?;
        let booking = bookings
            .create(
                &demo.manager,
                stay(&demo, guest, (check_in, check_out), total, commission),
            )
            .await?;
        info!(
            booking_id = %booking.id,
            guest = %booking.guest_name,
            payment_type = %booking.payment_type,
            net_revenue = %booking.net_revenue,
            outstanding = %booking.outstanding_balance,
            "Booking created"
        );
        stays.push(booking);
    }
    let walk_in = stays.pop().context("walk-in booking was not created")?;
    let ota_bookings = stays;

    for status in [BookingStatus::CheckedIn, BookingStatus::CheckedOut] {
        bookings
            .update(
                &demo.manager,
                walk_in.id,
                UpdateBookingInput {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;
    }
    info!(booking_id = %walk_in.id, "Walk-in guest checked out");

    let desk_payment = payments
        .create(
            &demo.manager,
            CreatePaymentInput {
                booking_id: walk_in.id,
                payment_type: PaymentType::HotelCollect,
                method: PaymentMethod::Card,
                amount: walk_in.total_amount,
                payment_date: check_out,
                status: None,
                collected_by_id: Some(demo.front_desk.id),
                received_from: None,
                reference: None,
                notes: Some("Settled at the desk".to_string()),
            },
        )
        .await?;

    for booking in &ota_bookings {
        payments
            .create(
                &demo.manager,
                CreatePaymentInput {
                    booking_id: booking.id,
                    payment_type: PaymentType::OtaCollect,
                    method: PaymentMethod::BankTransfer,
                    amount: booking.net_revenue,
                    payment_date: today,
                    status: None,
                    collected_by_id: None,
                    received_from: Some("Booking.com".to_string()),
                    reference: Some(format!("REM-{}", booking.id)),
                    notes: None,
                },
            )
            .await?;
    }

    let channel_invoice = invoices
        .create_from_bookings(
            &demo.manager,
            CreateFromBookingsInput {
                booking_ids: ota_bookings.iter().map(|b| b.id).collect(),
                payment_type: PaymentType::OtaCollect,
                notes: Some("Channel commission statement".to_string()),
            },
        )
        .await?;
    info!(
        invoice_number = %channel_invoice.invoice.invoice_number,
        total_amount = %channel_invoice.invoice.total_amount,
        items = channel_invoice.items.len(),
        "Channel invoice issued"
    );
    invoices
        .update_status(&demo.manager, channel_invoice.invoice.id, InvoiceStatus::Sent)
        .await?;

    let desk_invoice = invoices
        .create_from_payments(
            &demo.manager,
            CreateFromPaymentsInput {
                payment_ids: vec![desk_payment.id],
                notes: None,
            },
        )
        .await?;
    let outcome = invoices
        .cancel(&demo.manager, desk_invoice.invoice.id)
        .await?;
    info!(invoice_id = %outcome.invoice_id(), "Desk invoice cancelled; payment released");

    let listed = invoices
        .list(&demo.manager, InvoiceFilter::default(), PageRequest::default())
        .await?;
    for invoice in &listed.data {
        info!(
            invoice_number = %invoice.invoice_number,
            status = %invoice.status,
            strategy = %invoice.strategy,
            total_amount = %invoice.total_amount,
            "Invoice on file"
        );
    }

    info!(invoices = listed.meta.total, "Walkthrough complete");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Seeds a tenant with an admin, a manager owning one property, and a
/// front-desk user.
async fn seed_demo_tenant(store: &MemoryStore) -> DemoTenant {
    let tenant_id = TenantId::new();
    store
        .insert_tenant(Tenant {
            id: tenant_id,
            name: "Lagoon Hospitality".to_string(),
            created_at: Utc::now(),
        })
        .await;

    let mut actors = Vec::new();
    for (role, name, email) in [
        (Role::Admin, "Priya Nair", "owner@lagoon.example"),
        (Role::Manager, "Daniel Okafor", "manager@lagoon.example"),
        (Role::Staff, "Sofia Reyes", "desk@lagoon.example"),
    ] {
        let id = UserId::new();
        store
            .insert_user(User {
                id,
                tenant_id: Some(tenant_id),
                role,
                full_name: name.to_string(),
                email: email.to_string(),
                is_active: true,
            })
            .await;
        actors.push(Actor::new(id, tenant_id, role));
    }
    let [_admin, manager, front_desk] = [actors[0], actors[1], actors[2]];

    let property = Property {
        id: PropertyId::new(),
        tenant_id,
        owner_id: Some(manager.id),
        name: "Lagoon Beach Resort".to_string(),
        created_at: Utc::now(),
    };
    let room_type = RoomType {
        id: RoomTypeId::new(),
        tenant_id,
        property_id: property.id,
        name: "Garden Villa".to_string(),
        base_rate: Decimal::new(12000, 2),
    };
    store.insert_property(property.clone()).await;
    store.insert_room_type(room_type.clone()).await;

    DemoTenant {
        tenant_id,
        manager,
        front_desk,
        property,
        room_type,
    }
}

/// Booking input for a confirmed two-adult stay. Stays with a commission
/// come through a channel.
fn stay(
    demo: &DemoTenant,
    guest: &str,
    (check_in, check_out): (NaiveDate, NaiveDate),
    total: Decimal,
    commission: Option<Decimal>,
) -> CreateBookingInput {
    let payment_type = if commission.is_some() {
        PaymentType::OtaCollect
    } else {
        PaymentType::HotelCollect
    };
    CreateBookingInput {
        property_id: demo.property.id,
        room_type_id: demo.room_type.id,
        guest_name: guest.to_string(),
        guest_email: None,
        guest_phone: None,
        channel: commission.map(|_| "Booking.com".to_string()),
        check_in,
        check_out,
        adults: 2,
        children: 0,
        total_amount: total,
        commission,
        amount_paid: None,
        payment_method: None,
        payment_type,
        status: Some(BookingStatus::Confirmed),
        notes: None,
    }
}
