//! Rollup accumulation: the per-order fold.
//!
//! One pass over a pre-filtered order list builds every running total the
//! reports need: per-customer counts, sums, contributing dates, product
//! tallies and order details, the global per-product map, the monthly
//! chart buckets, and the grand totals. Currency sums stay unrounded
//! here; rounding is the finalizer's job, so error never compounds
//! mid-accumulation.
//!
//! The fold is pure: each call builds its own maps and returns them by
//! value. Nothing is shared between concurrent aggregation calls.
//!
//! Insertion order matters downstream - top-product and leaderboard ties
//! resolve in first-seen order - so every tally records a `first_seen`
//! ordinal for the finalizer to use as a secondary sort key.

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use chrono::{DateTime, Datelike, Utc};

use zenthra_core::{CustomerKey, OrderDetail, OrderRecord, ProductQuantity};

use super::identity::{self, CustomerIdentity};
use super::normalize::{self, RawItem};

// =============================================================================
// Status Predicates
// =============================================================================

fn lowered(value: Option<&str>) -> String {
    value.unwrap_or_default().to_lowercase()
}

/// Paid-order predicate: `payment_status` is `paid`, case-insensitively.
#[must_use]
pub fn is_paid(order: &OrderRecord) -> bool {
    lowered(order.payment_status.as_deref()) == "paid"
}

/// Abandoned-cart predicate: never paid and not cancelled,
/// case-insensitively on both fields.
#[must_use]
pub fn is_abandoned(order: &OrderRecord) -> bool {
    !is_paid(order) && lowered(order.status.as_deref()) != "cancelled"
}

/// Delivered-order predicate, for the dashboard's completed count.
#[must_use]
pub fn is_delivered(order: &OrderRecord) -> bool {
    lowered(order.status.as_deref()) == "delivered"
}

// =============================================================================
// Global Per-Product Totals
// =============================================================================

/// Running totals for one product.
#[derive(Debug, Clone)]
pub(crate) struct ProductTally {
    /// Display name; the first one seen for this product wins.
    pub(crate) name: String,
    pub(crate) quantity: f64,
    pub(crate) revenue: f64,
    /// Ordinal of first appearance, the tie-break for sorted views.
    pub(crate) first_seen: usize,
}

/// Global per-product accumulation across all qualifying orders,
/// independent of customer attribution.
#[derive(Debug, Default)]
pub struct ProductTotals {
    tallies: HashMap<String, ProductTally>,
}

impl ProductTotals {
    /// Fold one order's line items into the totals.
    pub fn ingest_order(&mut self, order: &OrderRecord) {
        for value in normalize::parse_items(&order.products).into_vec() {
            let item = RawItem::new(&value);
            let Some(product_id) = item.product_id() else {
                continue;
            };
            let Some(quantity) = item.quantity() else {
                continue;
            };
            let unit_price = item.unit_price();

            let next_ordinal = self.tallies.len();
            let tally = self
                .tallies
                .entry(product_id)
                .or_insert_with(|| ProductTally {
                    name: item.display_name(),
                    quantity: 0.0,
                    revenue: 0.0,
                    first_seen: next_ordinal,
                });
            tally.quantity += quantity;
            tally.revenue += quantity * unit_price;
        }
    }

    pub(crate) fn into_tallies(self) -> HashMap<String, ProductTally> {
        self.tallies
    }
}

// =============================================================================
// Customer Accumulation
// =============================================================================

/// Per-customer product tally, scoped to that customer's orders.
#[derive(Debug, Clone)]
pub(crate) struct CustomerProductTally {
    pub(crate) name: String,
    pub(crate) quantity: f64,
    pub(crate) first_seen: usize,
}

/// Everything accumulated for one customer key during the fold.
#[derive(Debug)]
pub(crate) struct CustomerRollup {
    /// Identity captured from the first contributing order.
    pub(crate) identity: CustomerIdentity,
    pub(crate) orders: u64,
    pub(crate) value: f64,
    /// Dates of contributing orders that carried a parseable `created`.
    pub(crate) order_dates: Vec<DateTime<Utc>>,
    pub(crate) product_totals: HashMap<String, CustomerProductTally>,
    pub(crate) details: Vec<OrderDetail>,
    /// Ordinal of the customer's first appearance.
    pub(crate) first_seen: usize,
}

impl CustomerRollup {
    fn new(identity: CustomerIdentity, first_seen: usize) -> Self {
        Self {
            identity,
            orders: 0,
            value: 0.0,
            order_dates: Vec::new(),
            product_totals: HashMap::new(),
            details: Vec::new(),
            first_seen,
        }
    }
}

/// One month bucket of the order time series, keyed by `YYYY-MM`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChartBucket {
    pub(crate) orders: u64,
    pub(crate) revenue: f64,
}

/// Result of folding a filtered order list by customer.
#[derive(Debug, Default)]
pub struct CustomerAccumulation {
    pub(crate) customers: HashMap<CustomerKey, CustomerRollup>,
    /// `BTreeMap` so the zero-padded `YYYY-MM` keys iterate in
    /// chronological order.
    pub(crate) chart: BTreeMap<String, ChartBucket>,
    pub(crate) total_orders: u64,
    pub(crate) total_value: f64,
}

/// Fold a pre-filtered order list into per-customer state.
///
/// Orders that resolve to no customer are skipped entirely; orders with
/// a missing or non-finite total contribute 0 to sums but still count;
/// orders with an unparseable `created` contribute no date and no chart
/// bucket but count everywhere else.
pub fn accumulate_customers<'a, I>(orders: I) -> CustomerAccumulation
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut accumulation = CustomerAccumulation::default();
    for order in orders {
        accumulation.ingest(order);
    }
    accumulation
}

impl CustomerAccumulation {
    fn ingest(&mut self, order: &OrderRecord) {
        let Some(identity) = identity::resolve_customer(order) else {
            tracing::debug!(order_id = %order.id, "order without attributable customer, skipping");
            return;
        };

        let total = order.total.filter(|total| total.is_finite()).unwrap_or(0.0);
        let created_at = order.created_at();
        if created_at.is_none() && order.created.is_some() {
            tracing::debug!(order_id = %order.id, "unparseable created timestamp");
        }

        let key = identity.key.clone();
        let next_ordinal = self.customers.len();
        let rollup = match self.customers.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(CustomerRollup::new(identity, next_ordinal)),
        };

        rollup.orders += 1;
        rollup.value += total;
        if let Some(created) = created_at {
            rollup.order_dates.push(created);
        }

        let items = normalize::parse_items(&order.products).into_vec();
        let items_count: f64 = items
            .iter()
            .map(|value| RawItem::new(value).counted_quantity())
            .sum();

        // Per-order product lines, aggregated by product id in first-seen
        // order. Orders carry few lines, so a vector scan beats a map.
        let mut order_lines: Vec<ProductQuantity> = Vec::new();

        for value in &items {
            let item = RawItem::new(value);
            let Some(product_id) = item.product_id() else {
                continue;
            };
            let Some(quantity) = item.quantity() else {
                continue;
            };

            let next_product_ordinal = rollup.product_totals.len();
            let tally = rollup
                .product_totals
                .entry(product_id.clone())
                .or_insert_with(|| CustomerProductTally {
                    name: item.display_name(),
                    quantity: 0.0,
                    first_seen: next_product_ordinal,
                });
            tally.quantity += quantity;

            if let Some(line) = order_lines
                .iter_mut()
                .find(|line| line.product_id == product_id)
            {
                line.quantity += quantity;
            } else {
                order_lines.push(ProductQuantity {
                    product_id,
                    name: item.display_name(),
                    quantity,
                });
            }
        }

        rollup.details.push(OrderDetail {
            id: order.id.clone(),
            total,
            status: order
                .status
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            payment_status: order.payment_status.clone(),
            created: order.created.clone().unwrap_or_default(),
            items_count,
            email: rollup.identity.key.email().to_owned(),
            phone: rollup.identity.key.phone().to_owned(),
            products: order_lines,
        });

        self.total_orders += 1;
        self.total_value += total;

        if let Some(created) = created_at {
            let month_key = format!("{:04}-{:02}", created.year(), created.month());
            let bucket = self.chart.entry(month_key).or_default();
            bucket.orders += 1;
            bucket.revenue += total;
        }
    }
}
