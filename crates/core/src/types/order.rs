//! Order records as read from the record store.
//!
//! Records arrive as loosely-typed JSON: CSV imports and older app
//! versions left stringly-typed numbers and four different shapes of
//! line-item payload behind. The types here keep deserialization lenient
//! so one odd record never fails a whole list fetch; interpretation of
//! the `products` payload is the aggregation engine's job.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Coerce a JSON value to a finite-or-not `f64` the way the store's data
/// demands: numbers pass through, numeric strings are parsed, everything
/// else is rejected.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parse a record `created` timestamp.
///
/// Accepts RFC 3339, the store's space-separated `2024-01-05 12:30:00.000Z`
/// form, and a bare `YYYY-MM-DD` date. Anything else is treated as absent
/// for date-based statistics.
#[must_use]
pub fn parse_created(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.fZ") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    None
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_number))
}

/// The expanded linked account attached to an order, when the store was
/// asked to expand the `user_id` relation and the order has one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Record id of the account.
    pub id: String,
    /// Account display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Account email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Account phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Expanded relations on an order record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderExpand {
    /// The linked account, expanded from the `user_id` relation.
    #[serde(rename = "user_id", default, skip_serializing_if = "Option::is_none")]
    pub account: Option<LinkedAccount>,
}

/// One purchase transaction as read from the record store.
///
/// Every field except `id` is optional: abandoned checkouts, CSV imports,
/// and guest orders all leave holes. `products` stays a raw
/// [`serde_json::Value`] because the payload shows up as a plain array, a
/// JSON-encoded string, a double-quoted CSV-escaped string, or a single
/// object depending on how the record was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Record id.
    pub id: String,
    /// Fulfillment status (free-form, e.g. `pending`, `shipped`,
    /// `delivered`, `cancelled`).
    #[serde(default)]
    pub status: Option<String>,
    /// Payment status (free-form, e.g. `paid`, `unpaid`, `refunded`).
    #[serde(default)]
    pub payment_status: Option<String>,
    /// Creation timestamp as the store serialized it.
    #[serde(default)]
    pub created: Option<String>,
    /// Order total. Accepts a JSON number or a numeric string; anything
    /// else deserializes as `None`.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub total: Option<f64>,
    /// Raw line-item payload, in whichever shape the record carries.
    #[serde(default)]
    pub products: Value,
    /// Denormalized customer name captured at checkout.
    #[serde(default)]
    pub customer_name: Option<String>,
    /// Denormalized customer email captured at checkout.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Denormalized customer phone captured at checkout.
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Expanded relations, when requested from the store.
    #[serde(default)]
    pub expand: OrderExpand,
}

impl OrderRecord {
    /// Parse the `created` timestamp, if present and valid.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created.as_deref().and_then(parse_created)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_number_shapes() {
        assert_eq!(coerce_number(&json!(12.5)), Some(12.5));
        assert_eq!(coerce_number(&json!("12.5")), Some(12.5));
        assert_eq!(coerce_number(&json!(" 3 ")), Some(3.0));
        assert_eq!(coerce_number(&json!("not a number")), None);
        assert_eq!(coerce_number(&json!(true)), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!([1])), None);
    }

    #[test]
    fn test_parse_created_rfc3339() {
        let dt = parse_created("2024-01-05T12:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-05T12:30:00+00:00");
    }

    #[test]
    fn test_parse_created_store_format() {
        let dt = parse_created("2024-01-05 12:30:00.123Z").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_704_457_800_123);

        // Without fractional seconds or trailing Z.
        assert!(parse_created("2024-01-05 12:30:00").is_some());
    }

    #[test]
    fn test_parse_created_bare_date() {
        let dt = parse_created("2024-01-05").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-01-05T00:00:00+00:00");
    }

    #[test]
    fn test_parse_created_invalid() {
        assert!(parse_created("").is_none());
        assert!(parse_created("   ").is_none());
        assert!(parse_created("yesterday").is_none());
        assert!(parse_created("2024-13-45").is_none());
    }

    #[test]
    fn test_order_record_deserializes_sparse_record() {
        let order: OrderRecord = serde_json::from_value(json!({
            "id": "rec_1"
        }))
        .unwrap();

        assert_eq!(order.id, "rec_1");
        assert!(order.status.is_none());
        assert!(order.total.is_none());
        assert!(order.products.is_null());
        assert!(order.expand.account.is_none());
    }

    #[test]
    fn test_order_record_lenient_total() {
        let order: OrderRecord = serde_json::from_value(json!({
            "id": "rec_1",
            "total": "99.90"
        }))
        .unwrap();
        assert_eq!(order.total, Some(99.90));

        let order: OrderRecord = serde_json::from_value(json!({
            "id": "rec_2",
            "total": {"amount": 5}
        }))
        .unwrap();
        assert!(order.total.is_none());
    }

    #[test]
    fn test_order_record_with_expand() {
        let order: OrderRecord = serde_json::from_value(json!({
            "id": "rec_1",
            "payment_status": "paid",
            "customer_email": "checkout@example.com",
            "expand": {
                "user_id": {
                    "id": "usr_9",
                    "name": "Jane",
                    "email": "jane@example.com"
                }
            }
        }))
        .unwrap();

        let account = order.expand.account.unwrap();
        assert_eq!(account.id, "usr_9");
        assert_eq!(account.email.as_deref(), Some("jane@example.com"));
        assert!(account.phone.is_none());
    }
}
