//! Analytics facade: one fetch, then a pure in-memory aggregation.
//!
//! Each entry point performs exactly one store read (the single
//! asynchronous suspension point), captures the reference instant once,
//! and hands everything to the pure functions in [`crate::engine`]. A
//! fetch failure propagates as-is; no partial report is ever returned.
//! There is no caching - repeated calls redo the full scan and are
//! idempotent on an unchanged order set.

use chrono::Utc;
use tracing::instrument;

use zenthra_core::{
    AbandonedCartAnalytics, CustomerOrderAnalytics, DashboardMetrics, ProductSalesSummary,
};

use crate::engine;
use crate::store::{OrderQuery, OrderStore, StoreError};

/// Optional created-date window for the product sales report. Pushed
/// down to the store query, not applied in memory.
#[derive(Debug, Clone, Default)]
pub struct SalesDateFilter {
    /// Inclusive start date.
    pub start_date: Option<String>,
    /// Inclusive end date.
    pub end_date: Option<String>,
}

/// The analytics entry points, generic over the order store.
#[derive(Debug, Clone)]
pub struct AnalyticsService<S> {
    store: S,
}

impl<S: OrderStore> AnalyticsService<S> {
    /// Create a service over an order store.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Product sales summary across all orders, optionally limited to a
    /// created-date window.
    ///
    /// # Errors
    ///
    /// Returns an error when the store read fails.
    #[instrument(skip(self))]
    pub async fn product_sales_summary(
        &self,
        filters: Option<&SalesDateFilter>,
    ) -> Result<ProductSalesSummary, StoreError> {
        let query = OrderQuery {
            created_after: filters.and_then(|filter| filter.start_date.clone()),
            created_before: filters.and_then(|filter| filter.end_date.clone()),
            expand_account: false,
        };
        let orders = self.store.list_orders(&query).await?;
        Ok(engine::product_sales_summary(&orders))
    }

    /// Paid-customer analytics across all orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the store read fails.
    #[instrument(skip(self))]
    pub async fn customer_order_analytics(&self) -> Result<CustomerOrderAnalytics, StoreError> {
        let orders = self
            .store
            .list_orders(&OrderQuery::with_account_expansion())
            .await?;
        Ok(engine::customer_order_analytics(&orders, Utc::now()))
    }

    /// Abandoned-cart analytics across all orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the store read fails.
    #[instrument(skip(self))]
    pub async fn abandoned_cart_analytics(&self) -> Result<AbandonedCartAnalytics, StoreError> {
        let orders = self
            .store
            .list_orders(&OrderQuery::with_account_expansion())
            .await?;
        Ok(engine::abandoned_cart_analytics(&orders, Utc::now()))
    }

    /// Dashboard headline figures across all orders.
    ///
    /// # Errors
    ///
    /// Returns an error when the store read fails.
    #[instrument(skip(self))]
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, StoreError> {
        let orders = self.store.list_orders(&OrderQuery::default()).await?;
        Ok(engine::dashboard_metrics(&orders, Utc::now()))
    }
}
