//! Report output types produced by the aggregation engine.
//!
//! These are the shapes handed to presentation code (admin dashboards,
//! the CLI). Field names serialize in camelCase to match what the report
//! components consume. All money values are `f64`: sums are accumulated
//! unrounded and only derived averages and chart revenue are rounded, in
//! the finalizer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::customer_key::CustomerKey;

// =============================================================================
// Product Sales Report
// =============================================================================

/// Sales totals for one product across all qualifying orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesMetric {
    /// Product id as it appears in the line items.
    pub product_id: String,
    /// Display name; the first non-empty name seen for this product wins.
    pub name: String,
    /// Total quantity sold.
    pub total_quantity: f64,
    /// Total revenue (`quantity * unit price`, summed).
    pub total_revenue: f64,
}

/// Product sales report: one row per distinct product id, sorted by
/// quantity sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesSummary {
    /// Per-product totals, best-selling first.
    pub items: Vec<ProductSalesMetric>,
    /// Number of distinct products that sold at all.
    pub total_products_sold: usize,
    /// Sum of `total_quantity` over `items`.
    pub total_items_sold: f64,
}

// =============================================================================
// Shared Customer Report Pieces
// =============================================================================

/// A product id/name/quantity triple, used both for a customer's
/// top-products list and for the lines of an order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantity {
    /// Product id.
    pub product_id: String,
    /// Display name.
    pub name: String,
    /// Quantity.
    pub quantity: f64,
}

/// One qualifying order, attributed to a customer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    /// Order record id.
    pub id: String,
    /// Order total (0 when the record's total is missing or malformed).
    pub total: f64,
    /// Fulfillment status (`unknown` when absent).
    pub status: String,
    /// Payment status, when the record has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    /// Creation timestamp as the store serialized it (empty when absent).
    pub created: String,
    /// Sum of every finite line-item quantity in the order's payload.
    pub items_count: f64,
    /// Normalized email half of the owning customer key.
    pub email: String,
    /// Normalized phone half of the owning customer key.
    pub phone: String,
    /// Per-product quantities within this order.
    pub products: Vec<ProductQuantity>,
}

/// One month bucket of the order time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Bucket key, `YYYY-MM` in UTC.
    pub month: String,
    /// Orders observed in the bucket.
    pub orders: u64,
    /// Revenue observed in the bucket, rounded to 2 decimals.
    pub revenue: f64,
}

// =============================================================================
// Paid-Customer Analytics
// =============================================================================

/// Lifetime-value profile of one customer, over paid orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrderSummary {
    /// The customer grouping key.
    pub user_id: CustomerKey,
    /// Display name (`Unknown customer` when nothing usable was found).
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// Normalized phone.
    pub phone: String,
    /// Linked-account record id, when the orders carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Number of paid orders.
    pub total_orders: u64,
    /// Unrounded sum of paid order totals.
    pub total_spend: f64,
    /// `total_spend / total_orders`, rounded to 2 decimals.
    pub average_order_value: f64,
    /// Earliest dated order, ISO 8601.
    pub first_order_date: Option<String>,
    /// Latest dated order, ISO 8601.
    pub last_order_date: Option<String>,
    /// Mean gap between consecutive dated orders in days, rounded to one
    /// decimal. Requires at least two dated orders.
    pub average_gap_days: Option<f64>,
    /// Days from the latest dated order to the report's reference instant,
    /// rounded to one decimal.
    pub days_since_last_order: Option<f64>,
    /// Top 5 products by quantity for this customer.
    pub top_products: Vec<ProductQuantity>,
}

/// Paid-customer analytics report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrderAnalytics {
    /// Every attributable customer, highest spend first.
    pub customers: Vec<CustomerOrderSummary>,
    /// Number of distinct customer keys.
    pub total_customers: usize,
    /// Paid, attributed orders counted into the report.
    pub total_orders: u64,
    /// Unrounded revenue over those orders.
    pub total_revenue: f64,
    /// Top 5 customers by spend.
    pub top_customers_by_spend: Vec<CustomerOrderSummary>,
    /// Top 5 customers by order count.
    pub top_customers_by_orders: Vec<CustomerOrderSummary>,
    /// Per-customer order details, newest order first.
    pub order_details: BTreeMap<CustomerKey, Vec<OrderDetail>>,
    /// Monthly time series, ascending by month.
    pub chart: Vec<ChartPoint>,
}

// =============================================================================
// Abandoned-Cart Analytics
// =============================================================================

/// Pending-order profile of one customer: orders never paid and not
/// cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonedCartSummary {
    /// The customer grouping key.
    pub user_id: CustomerKey,
    /// Display name (`Unknown customer` when nothing usable was found).
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// Normalized phone.
    pub phone: String,
    /// Linked-account record id, when the orders carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Number of pending orders.
    pub pending_orders: u64,
    /// Unrounded sum of pending order totals.
    pub total_value: f64,
    /// `total_value / pending_orders`, rounded to 2 decimals.
    pub average_order_value: f64,
    /// Earliest dated pending order, ISO 8601.
    pub first_pending_date: Option<String>,
    /// Latest dated pending order, ISO 8601.
    pub last_pending_date: Option<String>,
    /// Days from the latest dated pending order to the report's reference
    /// instant, rounded to one decimal.
    pub days_since_last_pending: Option<f64>,
    /// Top 5 products by quantity for this customer.
    pub top_products: Vec<ProductQuantity>,
}

/// Abandoned-cart analytics report, the pending-order mirror of
/// [`CustomerOrderAnalytics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbandonedCartAnalytics {
    /// Every attributable customer, highest pending value first.
    pub customers: Vec<AbandonedCartSummary>,
    /// Number of distinct customer keys.
    pub total_customers: usize,
    /// Pending, attributed orders counted into the report.
    pub total_pending_orders: u64,
    /// Unrounded value over those orders.
    pub total_pending_value: f64,
    /// Top 5 customers by pending value.
    pub top_customers_by_value: Vec<AbandonedCartSummary>,
    /// Top 5 customers by pending order count.
    pub top_customers_by_orders: Vec<AbandonedCartSummary>,
    /// Per-customer order details, newest order first.
    pub order_details: BTreeMap<CustomerKey, Vec<OrderDetail>>,
    /// Monthly time series, ascending by month.
    pub chart: Vec<ChartPoint>,
}

// =============================================================================
// Dashboard Metrics
// =============================================================================

/// Headline figures for the admin dashboard, computed from one full
/// order scan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Paid orders.
    pub total_orders: u64,
    /// Orders not marked paid.
    pub pending_orders: u64,
    /// Orders with `delivered` status.
    pub completed_orders: u64,
    /// Revenue over paid orders, unrounded.
    pub total_revenue: f64,
    /// `total_revenue / total_orders`, rounded to 2 decimals.
    pub average_order_value: f64,
    /// Revenue over paid orders created in the reference instant's UTC day.
    pub revenue_today: f64,
}
