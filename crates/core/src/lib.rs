//! Core business logic for MioSaaS.
//!
//! This crate contains pure business logic with ZERO web or database dependencies
//! (the HTTP gateway is the one deliberate exception: it is the client-side
//! counterpart of the REST surface and lives here so both sides share one
//! entry model).
//!
//! # Modules
//!
//! - `entry` - VAT-aware ledger entry parsing, computation, validation, submission
//! - `auth` - Password hashing
//! - `storage` - Presigned upload URLs for attachments

pub mod auth;
pub mod entry;
pub mod storage;
