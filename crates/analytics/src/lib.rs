//! Zenthra Analytics - order aggregation engine and record-store client.
//!
//! # Architecture
//!
//! - [`engine`] - pure aggregation: payload normalization, customer
//!   identity resolution, the rollup fold, and finalization
//! - [`store`] - the [`store::OrderStore`] seam and the REST client that
//!   implements it
//! - [`service`] - the facade tying one fetch to one aggregation pass
//! - [`config`] - environment-based store configuration
//!
//! # Example
//!
//! ```rust,ignore
//! use zenthra_analytics::{AnalyticsService, config::StoreConfig, store::RecordStoreClient};
//!
//! let config = StoreConfig::from_env()?;
//! let service = AnalyticsService::new(RecordStoreClient::new(&config)?);
//!
//! let paid = service.customer_order_analytics().await?;
//! println!("{} customers", paid.total_customers);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod engine;
pub mod service;
pub mod store;

pub use service::{AnalyticsService, SalesDateFilter};
