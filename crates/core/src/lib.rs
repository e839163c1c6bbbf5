//! Core business logic for Staydesk.
//!
//! This crate contains the business rules of the property-management core
//! with ZERO web or database dependencies. Persistence is reached through the
//! [`store`] traits, implemented by `staydesk-db`.
//!
//! # Modules
//!
//! - `access` - Tenant and property-ownership authorization
//! - `finance` - Booking figures and payment directions
//! - `booking` - Booking lifecycle
//! - `payment` - Payment recording
//! - `invoice` - Invoice aggregation and cancellation
//! - `tenancy` - Tenants, users, properties and room types
//! - `audit` - Audit events for every mutation
//! - `store` - Transactional persistence contract

pub mod access;
pub mod audit;
pub mod booking;
pub mod finance;
pub mod invoice;
pub mod payment;
pub mod store;
pub mod tenancy;
