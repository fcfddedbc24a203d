//! Post-pass finalization: derived statistics and sorted views.
//!
//! Everything here needs the complete accumulated state: date-gap
//! averages need a customer's full ordered history, leaderboards need
//! every customer, the chart needs every bucket. The finalizer is also
//! the only place money-derived values are rounded - running sums stay
//! raw, derived averages and chart revenue get 2 decimals, day counts
//! get 1.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};

use zenthra_core::{
    ChartPoint, CustomerKey, OrderDetail, ProductQuantity, ProductSalesMetric, ProductSalesSummary,
    parse_created,
};

use super::rollup::{CustomerAccumulation, CustomerRollup, ProductTotals};

/// Leaderboard and top-products slice length.
pub(crate) const TOP_N: usize = 5;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Round to 2 decimal places (money-derived values).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round to 1 decimal place (day counts).
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Product Sales
// =============================================================================

/// Render accumulated product totals as the product sales report:
/// best-selling first, ties in first-seen order.
#[must_use]
pub fn finalize_product_totals(totals: ProductTotals) -> ProductSalesSummary {
    let mut entries: Vec<_> = totals.into_tallies().into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| {
        b.quantity
            .total_cmp(&a.quantity)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });

    let items: Vec<ProductSalesMetric> = entries
        .into_iter()
        .map(|(product_id, tally)| ProductSalesMetric {
            product_id,
            name: tally.name,
            total_quantity: tally.quantity,
            total_revenue: tally.revenue,
        })
        .collect();

    let total_items_sold = items.iter().map(|item| item.total_quantity).sum();

    ProductSalesSummary {
        total_products_sold: items.len(),
        total_items_sold,
        items,
    }
}

// =============================================================================
// Customer Reports
// =============================================================================

/// One customer after finalization, independent of the paid/pending
/// naming of the output variant.
#[derive(Debug, Clone)]
pub struct FinalizedCustomer {
    pub key: CustomerKey,
    pub name: String,
    pub account_id: Option<String>,
    pub orders: u64,
    pub value: f64,
    pub average_order_value: f64,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub average_gap_days: Option<f64>,
    pub days_since_last: Option<f64>,
    pub top_products: Vec<ProductQuantity>,
    first_seen: usize,
}

/// A finalized customer report before variant naming is applied.
#[derive(Debug)]
pub struct FinalizedReport {
    /// Customers sorted descending by accumulated value, ties in
    /// first-seen order. The spend/value leaderboard is the first
    /// [`TOP_N`] entries of this list.
    pub customers: Vec<FinalizedCustomer>,
    /// Top [`TOP_N`] customers by order count.
    pub top_by_orders: Vec<FinalizedCustomer>,
    /// Per-customer order details, newest first.
    pub order_details: BTreeMap<CustomerKey, Vec<OrderDetail>>,
    /// Monthly series, ascending by `YYYY-MM` key.
    pub chart: Vec<ChartPoint>,
    pub total_orders: u64,
    pub total_value: f64,
}

/// Compute every derived statistic that needs the complete accumulated
/// state.
///
/// `now` is the single reference instant for recency figures; the caller
/// captures it once per aggregation call so every customer in one
/// response shares it.
// Order counts and millisecond spans stay far inside f64's exact integer
// range (2^53).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn finalize_customers(
    accumulation: CustomerAccumulation,
    now: DateTime<Utc>,
) -> FinalizedReport {
    let CustomerAccumulation {
        customers,
        chart,
        total_orders,
        total_value,
    } = accumulation;

    let mut order_details = BTreeMap::new();
    let mut finalized: Vec<FinalizedCustomer> = Vec::with_capacity(customers.len());

    for (key, rollup) in customers {
        let CustomerRollup {
            identity,
            orders,
            value,
            mut order_dates,
            product_totals,
            mut details,
            first_seen,
        } = rollup;

        order_dates.sort_unstable();
        let first_date = order_dates.first().map(iso);
        let last_date = order_dates.last().map(iso);

        let average_gap_days = (order_dates.len() > 1).then(|| {
            let gap_total: i64 = order_dates
                .iter()
                .zip(order_dates.iter().skip(1))
                .map(|(earlier, later)| (*later - *earlier).num_milliseconds())
                .sum();
            round1(gap_total as f64 / (order_dates.len() - 1) as f64 / MILLIS_PER_DAY)
        });

        let days_since_last = order_dates
            .last()
            .map(|last| round1((now - *last).num_milliseconds() as f64 / MILLIS_PER_DAY));

        let average_order_value = if orders > 0 {
            round2(value / orders as f64)
        } else {
            0.0
        };

        let mut tallies: Vec<_> = product_totals.into_iter().collect();
        tallies.sort_by(|(_, a), (_, b)| {
            b.quantity
                .total_cmp(&a.quantity)
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        let top_products = tallies
            .into_iter()
            .take(TOP_N)
            .map(|(product_id, tally)| ProductQuantity {
                product_id,
                name: tally.name,
                quantity: tally.quantity,
            })
            .collect();

        // Newest order first; orders without a parseable date sort last.
        details.sort_by_cached_key(|detail| std::cmp::Reverse(parse_created(&detail.created)));

        finalized.push(FinalizedCustomer {
            name: identity.name,
            account_id: identity.account_id,
            orders,
            value,
            average_order_value,
            first_date,
            last_date,
            average_gap_days,
            days_since_last,
            top_products,
            first_seen,
            key: key.clone(),
        });
        order_details.insert(key, details);
    }

    finalized.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });

    let mut top_by_orders = finalized.clone();
    top_by_orders.sort_by(|a, b| {
        b.orders
            .cmp(&a.orders)
            .then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    top_by_orders.truncate(TOP_N);

    let chart = chart
        .into_iter()
        .map(|(month, bucket)| ChartPoint {
            month,
            orders: bucket.orders,
            revenue: round2(bucket.revenue),
        })
        .collect();

    FinalizedReport {
        customers: finalized,
        top_by_orders,
        order_details,
        chart,
        total_orders,
        total_value,
    }
}
