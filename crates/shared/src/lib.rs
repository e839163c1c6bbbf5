//! Shared types, errors, and configuration for Staydesk.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The request principal (`Actor`) and its `Role`
//! - Boundary parsing of monetary amounts into decimals
//! - Pagination types for list operations
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod types;

pub use auth::{Actor, Role};
pub use config::{AppConfig, BookingConfig, InvoiceConfig, LoggingConfig};
pub use error::{AppError, AppResult};
