//! Customer identity resolution.
//!
//! Orders carry identity in two places: an optional linked-account
//! relation (expanded by the store on request) and denormalized
//! `customer_*` fields captured at checkout. The account wins when both
//! are present. Orders where neither source yields a usable email or
//! phone are unattributable and stay out of customer-level rollups.

use zenthra_core::{CustomerKey, OrderRecord};

/// Display name used when no usable customer name is present.
pub const UNKNOWN_CUSTOMER: &str = "Unknown customer";

/// A per-order customer attribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerIdentity {
    /// Grouping key for customer rollups.
    pub key: CustomerKey,
    /// Display name.
    pub name: String,
    /// Linked-account record id, when the order carried an expansion.
    pub account_id: Option<String>,
}

/// Resolve the customer an order belongs to, or `None` when the order is
/// not attributable to anyone.
///
/// Field preference is account-then-order per field, not per source: an
/// expanded account with no phone still falls back to the order's
/// `customer_phone`. An account field that is present but empty does not
/// fall back - it normalizes to the empty half of the key, matching how
/// checkout has always written these records.
#[must_use]
pub fn resolve_customer(order: &OrderRecord) -> Option<CustomerIdentity> {
    let account = order.expand.account.as_ref();

    let email = account
        .and_then(|account| account.email.as_deref())
        .or(order.customer_email.as_deref())
        .unwrap_or_default();
    let phone = account
        .and_then(|account| account.phone.as_deref())
        .or(order.customer_phone.as_deref())
        .unwrap_or_default();

    let key = CustomerKey::from_contact(email, phone)?;

    let name = account
        .and_then(|account| account.name.as_deref())
        .or(order.customer_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map_or_else(|| UNKNOWN_CUSTOMER.to_owned(), str::to_owned);

    Some(CustomerIdentity {
        key,
        name,
        account_id: account.map(|account| account.id.clone()),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zenthra_core::{LinkedAccount, OrderExpand};

    fn order_with_checkout_fields() -> OrderRecord {
        OrderRecord {
            id: "rec_1".to_owned(),
            customer_name: Some("Checkout Name".to_owned()),
            customer_email: Some("Checkout@Example.com".to_owned()),
            customer_phone: Some("(555) 010-1111".to_owned()),
            ..OrderRecord::default()
        }
    }

    fn linked(email: Option<&str>, phone: Option<&str>, name: Option<&str>) -> OrderExpand {
        OrderExpand {
            account: Some(LinkedAccount {
                id: "usr_1".to_owned(),
                name: name.map(str::to_owned),
                email: email.map(str::to_owned),
                phone: phone.map(str::to_owned),
            }),
        }
    }

    #[test]
    fn test_denormalized_fields_resolve() {
        let identity = resolve_customer(&order_with_checkout_fields()).unwrap();
        assert_eq!(identity.key.as_str(), "checkout@example.com::5550101111");
        assert_eq!(identity.name, "Checkout Name");
        assert!(identity.account_id.is_none());
    }

    #[test]
    fn test_linked_account_wins_over_checkout_fields() {
        let mut order = order_with_checkout_fields();
        order.expand = linked(
            Some("Account@Example.com"),
            Some("555-010-2222"),
            Some("Account Name"),
        );

        let identity = resolve_customer(&order).unwrap();
        assert_eq!(identity.key.as_str(), "account@example.com::5550102222");
        assert_eq!(identity.name, "Account Name");
        assert_eq!(identity.account_id.as_deref(), Some("usr_1"));
    }

    #[test]
    fn test_account_missing_fields_fall_back_per_field() {
        let mut order = order_with_checkout_fields();
        order.expand = linked(Some("account@example.com"), None, None);

        let identity = resolve_customer(&order).unwrap();
        // Email from the account, phone and name from the checkout fields.
        assert_eq!(identity.key.as_str(), "account@example.com::5550101111");
        assert_eq!(identity.name, "Checkout Name");
    }

    #[test]
    fn test_account_empty_email_does_not_fall_back() {
        let mut order = order_with_checkout_fields();
        order.expand = linked(Some(""), None, None);

        let identity = resolve_customer(&order).unwrap();
        assert_eq!(identity.key.as_str(), "::5550101111");
    }

    #[test]
    fn test_unattributable_order() {
        let order = OrderRecord {
            id: "rec_2".to_owned(),
            customer_phone: Some("ext.".to_owned()),
            ..OrderRecord::default()
        };
        assert!(resolve_customer(&order).is_none());
    }

    #[test]
    fn test_blank_name_gets_placeholder() {
        let mut order = order_with_checkout_fields();
        order.customer_name = Some("   ".to_owned());

        let identity = resolve_customer(&order).unwrap();
        assert_eq!(identity.name, UNKNOWN_CUSTOMER);
    }
}
