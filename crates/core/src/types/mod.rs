//! Core types for Zenthra analytics.
//!
//! This module provides the order record as read from the record store,
//! the normalized customer key, and the report output types.

pub mod customer_key;
pub mod order;
pub mod report;

pub use customer_key::{CustomerKey, normalize_email, normalize_phone};
pub use order::{LinkedAccount, OrderExpand, OrderRecord, coerce_number, parse_created};
pub use report::*;
