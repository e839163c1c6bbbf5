//! Tenancy entities: tenants, users, properties and room types.
//!
//! These are the anchors of every ownership chain. Their CRUD lives outside
//! the core; the core only reads them.

pub mod types;

pub use types::{Property, RoomType, Tenant, User};
