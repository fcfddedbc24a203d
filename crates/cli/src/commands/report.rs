//! Report commands: run one aggregation and print it as JSON.
//!
//! # Environment Variables
//!
//! - `ZENTHRA_STORE_URL` - Base URL of the record store
//! - `ZENTHRA_STORE_TOKEN` - Optional API token for authenticated reads

use thiserror::Error;

use zenthra_analytics::{
    AnalyticsService, SalesDateFilter,
    config::{ConfigError, StoreConfig},
    store::{RecordStoreClient, StoreError},
};

/// Errors that can occur while running a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The record store read failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The report could not be rendered as JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

fn service() -> Result<AnalyticsService<RecordStoreClient>, ReportError> {
    dotenvy::dotenv().ok();

    let config = StoreConfig::from_env()?;
    Ok(AnalyticsService::new(RecordStoreClient::new(&config)?))
}

// Reports are the command's output stream.
#[allow(clippy::print_stdout)]
fn emit<T: serde::Serialize>(report: &T) -> Result<(), ReportError> {
    let rendered = serde_json::to_string_pretty(report)?;
    println!("{rendered}");
    Ok(())
}

/// Run the product sales summary, optionally date-windowed.
///
/// # Errors
///
/// Returns an error when configuration is missing or the store read
/// fails.
pub async fn products(start: Option<String>, end: Option<String>) -> Result<(), ReportError> {
    let service = service()?;
    let filter = SalesDateFilter {
        start_date: start,
        end_date: end,
    };
    let summary = service.product_sales_summary(Some(&filter)).await?;
    emit(&summary)
}

/// Run the paid-customer analytics report.
///
/// # Errors
///
/// Returns an error when configuration is missing or the store read
/// fails.
pub async fn customers() -> Result<(), ReportError> {
    let analytics = service()?.customer_order_analytics().await?;
    emit(&analytics)
}

/// Run the abandoned-cart analytics report.
///
/// # Errors
///
/// Returns an error when configuration is missing or the store read
/// fails.
pub async fn abandoned() -> Result<(), ReportError> {
    let analytics = service()?.abandoned_cart_analytics().await?;
    emit(&analytics)
}

/// Run the dashboard metrics report.
///
/// # Errors
///
/// Returns an error when configuration is missing or the store read
/// fails.
pub async fn dashboard() -> Result<(), ReportError> {
    let metrics = service()?.dashboard_metrics().await?;
    emit(&metrics)
}
