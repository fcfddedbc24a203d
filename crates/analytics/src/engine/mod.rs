//! The customer/order analytics aggregation engine.
//!
//! A batch pipeline over raw order records:
//!
//! 1. [`normalize`] decodes each order's polymorphic line-item payload.
//! 2. [`identity`] attributes each order to a customer key, or to nobody.
//! 3. [`rollup`] folds the filtered orders into running accumulators.
//! 4. [`finalize`] computes the statistics that need complete history and
//!    renders sorted, sliced views.
//!
//! The entry points here are pure functions over an already-fetched order
//! list plus a caller-captured reference instant. Fetching lives in
//! [`crate::service`]; keeping the math synchronous and allocation-local
//! means two concurrent report calls can never observe each other's
//! partial state.
//!
//! Bad data never fails a report. A malformed payload is an order with no
//! items, an unattributable order stays out of customer rollups, an
//! unparseable date stays out of date statistics - each degradation is
//! local to the record that caused it.

pub mod finalize;
pub mod identity;
pub mod normalize;
pub mod rollup;

use chrono::{DateTime, Utc};

use zenthra_core::{
    AbandonedCartAnalytics, AbandonedCartSummary, CustomerOrderAnalytics, CustomerOrderSummary,
    DashboardMetrics, OrderRecord, ProductSalesSummary,
};

use finalize::{FinalizedCustomer, TOP_N};

/// Product sales summary over every order in the list.
///
/// No payment-status or identity requirement: every decodable line item
/// counts toward the global per-product totals.
#[must_use]
pub fn product_sales_summary(orders: &[OrderRecord]) -> ProductSalesSummary {
    let mut totals = rollup::ProductTotals::default();
    for order in orders {
        totals.ingest_order(order);
    }
    finalize::finalize_product_totals(totals)
}

/// Paid-customer analytics over the orders with `payment_status == "paid"`
/// (case-insensitive).
///
/// Orders failing the predicate or resolving to no customer are skipped
/// entirely and appear nowhere in this report. `now` is the reference
/// instant for recency figures, captured once by the caller.
#[must_use]
pub fn customer_order_analytics(
    orders: &[OrderRecord],
    now: DateTime<Utc>,
) -> CustomerOrderAnalytics {
    let accumulation =
        rollup::accumulate_customers(orders.iter().filter(|order| rollup::is_paid(order)));
    let report = finalize::finalize_customers(accumulation, now);

    let customers: Vec<CustomerOrderSummary> = report.customers.iter().map(paid_summary).collect();

    CustomerOrderAnalytics {
        total_customers: customers.len(),
        total_orders: report.total_orders,
        total_revenue: report.total_value,
        top_customers_by_spend: customers.iter().take(TOP_N).cloned().collect(),
        top_customers_by_orders: report.top_by_orders.iter().map(paid_summary).collect(),
        customers,
        order_details: report.order_details,
        chart: report.chart,
    }
}

/// Abandoned-cart analytics over the orders that were never paid and not
/// cancelled (case-insensitive on both fields).
///
/// The structural mirror of [`customer_order_analytics`] with pending
/// semantics: same fold, same finalization, pending-named output and no
/// purchase-cadence average.
#[must_use]
pub fn abandoned_cart_analytics(
    orders: &[OrderRecord],
    now: DateTime<Utc>,
) -> AbandonedCartAnalytics {
    let accumulation =
        rollup::accumulate_customers(orders.iter().filter(|order| rollup::is_abandoned(order)));
    let report = finalize::finalize_customers(accumulation, now);

    let customers: Vec<AbandonedCartSummary> =
        report.customers.iter().map(pending_summary).collect();

    AbandonedCartAnalytics {
        total_customers: customers.len(),
        total_pending_orders: report.total_orders,
        total_pending_value: report.total_value,
        top_customers_by_value: customers.iter().take(TOP_N).cloned().collect(),
        top_customers_by_orders: report.top_by_orders.iter().map(pending_summary).collect(),
        customers,
        order_details: report.order_details,
        chart: report.chart,
    }
}

/// Dashboard headline figures over every order in the list.
///
/// Paid orders drive revenue; anything unpaid counts as pending;
/// delivered orders count as completed regardless of payment.
/// `revenue_today` covers paid orders created in `now`'s UTC day.
// Order counts stay far inside f64's exact integer range (2^53).
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn dashboard_metrics(orders: &[OrderRecord], now: DateTime<Utc>) -> DashboardMetrics {
    let today = now.date_naive();
    let mut metrics = DashboardMetrics::default();

    for order in orders {
        let total = order.total.filter(|total| total.is_finite()).unwrap_or(0.0);

        if rollup::is_paid(order) {
            metrics.total_orders += 1;
            metrics.total_revenue += total;
            if order
                .created_at()
                .is_some_and(|created| created.date_naive() == today)
            {
                metrics.revenue_today += total;
            }
        } else {
            metrics.pending_orders += 1;
        }

        if rollup::is_delivered(order) {
            metrics.completed_orders += 1;
        }
    }

    if metrics.total_orders > 0 {
        metrics.average_order_value =
            finalize::round2(metrics.total_revenue / metrics.total_orders as f64);
    }

    metrics
}

fn paid_summary(customer: &FinalizedCustomer) -> CustomerOrderSummary {
    CustomerOrderSummary {
        user_id: customer.key.clone(),
        name: customer.name.clone(),
        email: customer.key.email().to_owned(),
        phone: customer.key.phone().to_owned(),
        account_id: customer.account_id.clone(),
        total_orders: customer.orders,
        total_spend: customer.value,
        average_order_value: customer.average_order_value,
        first_order_date: customer.first_date.clone(),
        last_order_date: customer.last_date.clone(),
        average_gap_days: customer.average_gap_days,
        days_since_last_order: customer.days_since_last,
        top_products: customer.top_products.clone(),
    }
}

fn pending_summary(customer: &FinalizedCustomer) -> AbandonedCartSummary {
    AbandonedCartSummary {
        user_id: customer.key.clone(),
        name: customer.name.clone(),
        email: customer.key.email().to_owned(),
        phone: customer.key.phone().to_owned(),
        account_id: customer.account_id.clone(),
        pending_orders: customer.orders,
        total_value: customer.value,
        average_order_value: customer.average_order_value,
        first_pending_date: customer.first_date.clone(),
        last_pending_date: customer.last_date.clone(),
        days_since_last_pending: customer.days_since_last,
        top_products: customer.top_products.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn order(id: &str, payment: &str, status: &str, total: f64) -> OrderRecord {
        OrderRecord {
            id: id.to_owned(),
            payment_status: Some(payment.to_owned()),
            status: Some(status.to_owned()),
            total: Some(total),
            customer_email: Some("jane@example.com".to_owned()),
            customer_name: Some("Jane".to_owned()),
            ..OrderRecord::default()
        }
    }

    #[test]
    fn test_single_paid_order_scenario() {
        let mut single = order("o1", "paid", "pending", 100.0);
        single.products = json!([{"product_id": "p1", "quantity": 2, "price": 50}]);

        let analytics = customer_order_analytics(&[single], fixed_now());

        assert_eq!(analytics.total_customers, 1);
        assert_eq!(analytics.total_orders, 1);
        assert_eq!(analytics.total_revenue, 100.0);

        let customer = analytics.customers.first().unwrap();
        assert_eq!(customer.total_orders, 1);
        assert_eq!(customer.total_spend, 100.0);
        assert_eq!(customer.average_order_value, 100.0);
        assert_eq!(customer.top_products.len(), 1);
        let top = customer.top_products.first().unwrap();
        assert_eq!(top.product_id, "p1");
        assert_eq!(top.quantity, 2.0);

        let details = analytics.order_details.get(&customer.user_id).unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details.first().unwrap().items_count, 2.0);
    }

    #[test]
    fn test_string_payload_scenario_matches_array_form() {
        let mut string_form = order("o1", "paid", "pending", 30.0);
        string_form.products =
            json!("[{\"productId\":\"p2\",\"quantity\":1,\"unitPrice\":30}]");
        let mut array_form = order("o1", "paid", "pending", 30.0);
        array_form.products = json!([{"productId": "p2", "quantity": 1, "unitPrice": 30}]);

        let from_string = customer_order_analytics(&[string_form], fixed_now());
        let from_array = customer_order_analytics(&[array_form], fixed_now());
        assert_eq!(from_string, from_array);

        let top = &from_string.customers.first().unwrap().top_products;
        assert_eq!(top.first().unwrap().product_id, "p2");
    }

    #[test]
    fn test_identity_less_paid_order_counts_only_in_product_summary() {
        let mut anonymous = order("o1", "paid", "pending", 75.0);
        anonymous.customer_email = None;
        anonymous.customer_name = None;
        anonymous.products = json!([{"product_id": "p1", "quantity": 1, "price": 75}]);

        let analytics = customer_order_analytics(std::slice::from_ref(&anonymous), fixed_now());
        assert!(analytics.customers.is_empty());
        assert!(analytics.order_details.is_empty());
        assert_eq!(analytics.total_orders, 0);
        assert_eq!(analytics.total_revenue, 0.0);

        let products = product_sales_summary(&[anonymous]);
        assert_eq!(products.total_products_sold, 1);
        assert_eq!(products.total_items_sold, 1.0);
        assert_eq!(products.items.first().unwrap().total_revenue, 75.0);
    }

    #[test]
    fn test_monthly_cadence_scenario() {
        let mut first = order("o1", "paid", "pending", 10.0);
        first.created = Some("2024-01-05 00:00:00.000Z".to_owned());
        let mut second = order("o2", "paid", "pending", 20.0);
        second.created = Some("2024-02-05 00:00:00.000Z".to_owned());

        let analytics = customer_order_analytics(&[first, second], fixed_now());

        let customer = analytics.customers.first().unwrap();
        assert_eq!(customer.average_gap_days, Some(31.0));

        let months: Vec<(&str, u64)> = analytics
            .chart
            .iter()
            .map(|point| (point.month.as_str(), point.orders))
            .collect();
        assert_eq!(months, vec![("2024-01", 1), ("2024-02", 1)]);
    }

    #[test]
    fn test_refunded_cancelled_order_excluded_from_both_reports() {
        let dead = order("o1", "refunded", "cancelled", 40.0);

        let paid = customer_order_analytics(std::slice::from_ref(&dead), fixed_now());
        assert_eq!(paid.total_orders, 0);

        let abandoned = abandoned_cart_analytics(&[dead], fixed_now());
        assert_eq!(abandoned.total_pending_orders, 0);
        assert!(abandoned.customers.is_empty());
    }

    #[test]
    fn test_abandoned_report_mirrors_paid_shape() {
        let mut cart = order("o1", "unpaid", "pending", 60.0);
        cart.created = Some("2024-02-20 00:00:00.000Z".to_owned());
        cart.products = json!([{"product_id": "p9", "quantity": 3, "price": 20}]);

        let analytics = abandoned_cart_analytics(&[cart], fixed_now());

        assert_eq!(analytics.total_customers, 1);
        assert_eq!(analytics.total_pending_orders, 1);
        assert_eq!(analytics.total_pending_value, 60.0);

        let customer = analytics.customers.first().unwrap();
        assert_eq!(customer.pending_orders, 1);
        assert_eq!(customer.total_value, 60.0);
        assert_eq!(customer.average_order_value, 60.0);
        assert_eq!(
            customer.first_pending_date.as_deref(),
            Some("2024-02-20T00:00:00.000Z")
        );
        // 2024-02-20 to 2024-03-01T12:00 is 10.5 days.
        assert_eq!(customer.days_since_last_pending, Some(10.5));
        assert_eq!(customer.top_products.first().unwrap().product_id, "p9");
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_total_spend_matches_order_details() {
        let orders = vec![
            order("o1", "paid", "pending", 12.34),
            order("o2", "paid", "shipped", 56.78),
            order("o3", "paid", "delivered", 9.0),
        ];
        let analytics = customer_order_analytics(&orders, fixed_now());

        for customer in &analytics.customers {
            let details = analytics.order_details.get(&customer.user_id).unwrap();
            let detail_sum: f64 = details.iter().map(|detail| detail.total).sum();
            assert!((customer.total_spend - detail_sum).abs() < 1e-9);

            // averageOrderValue reconstructs the spend within rounding
            // tolerance.
            let reconstructed = customer.average_order_value * customer.total_orders as f64;
            assert!(
                (reconstructed - customer.total_spend).abs() <= 0.01 * customer.total_orders as f64
            );
        }
    }

    #[test]
    fn test_product_summary_items_sum_to_total() {
        let mut with_items = order("o1", "unpaid", "pending", 0.0);
        with_items.products = json!([
            {"product_id": "p1", "quantity": 2, "price": 5},
            {"product_id": "p2", "quantity": "3", "price": 1}
        ]);
        let summary = product_sales_summary(&[with_items]);

        let quantity_sum: f64 = summary.items.iter().map(|item| item.total_quantity).sum();
        assert_eq!(summary.total_items_sold, quantity_sum);
        assert_eq!(summary.total_items_sold, 5.0);
    }

    #[test]
    fn test_entry_points_are_idempotent() {
        let mut first = order("o1", "paid", "pending", 100.0);
        first.created = Some("2024-01-05 00:00:00.000Z".to_owned());
        first.products = json!([{"product_id": "p1", "quantity": 2, "price": 50}]);
        let mut second = order("o2", "unpaid", "pending", 25.0);
        second.customer_email = Some("other@example.com".to_owned());
        let orders = vec![first, second];
        let now = fixed_now();

        let once = serde_json::to_vec(&customer_order_analytics(&orders, now)).unwrap();
        let twice = serde_json::to_vec(&customer_order_analytics(&orders, now)).unwrap();
        assert_eq!(once, twice);

        let once = serde_json::to_vec(&abandoned_cart_analytics(&orders, now)).unwrap();
        let twice = serde_json::to_vec(&abandoned_cart_analytics(&orders, now)).unwrap();
        assert_eq!(once, twice);

        let once = serde_json::to_vec(&product_sales_summary(&orders)).unwrap();
        let twice = serde_json::to_vec(&product_sales_summary(&orders)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_dashboard_metrics() {
        let mut paid_today = order("o1", "paid", "delivered", 100.0);
        paid_today.created = Some("2024-03-01 08:00:00.000Z".to_owned());
        let mut paid_before = order("o2", "PAID", "shipped", 50.0);
        paid_before.created = Some("2024-02-01 08:00:00.000Z".to_owned());
        let unpaid = order("o3", "unpaid", "pending", 30.0);

        let metrics = dashboard_metrics(&[paid_today, paid_before, unpaid], fixed_now());

        assert_eq!(metrics.total_orders, 2);
        assert_eq!(metrics.pending_orders, 1);
        assert_eq!(metrics.completed_orders, 1);
        assert_eq!(metrics.total_revenue, 150.0);
        assert_eq!(metrics.average_order_value, 75.0);
        assert_eq!(metrics.revenue_today, 100.0);
    }
}
