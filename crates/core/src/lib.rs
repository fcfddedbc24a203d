//! Zenthra Core - Shared types library.
//!
//! This crate provides common types used across the Zenthra analytics
//! components:
//! - `analytics` - Order aggregation engine and record-store client
//! - `cli` - Command-line report runner
//!
//! # Architecture
//!
//! The core crate contains only types and conversions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Order records, the customer key, and report output types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
