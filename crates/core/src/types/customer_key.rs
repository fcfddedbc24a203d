//! Normalized customer identity key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Separator between the email and phone halves of a [`CustomerKey`].
const SEPARATOR: &str = "::";

/// Normalize an email address for identity matching: trim and lower-case.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Normalize a phone number for identity matching: keep digits only.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// A customer grouping key derived from normalized contact fields.
///
/// Orders are attributed to customers by a composite of the normalized
/// email and the normalized phone number, joined by `::`. The key is an
/// approximation, not a real-world identity: two people sharing an email
/// address (or a phone number with a differently-formatted email) collapse
/// into one key. This matches how the store's reports have always counted
/// customers and must not be tightened without changing those counts.
///
/// An order with neither a usable email nor a usable phone has no key and
/// is excluded from customer-level rollups.
///
/// ## Examples
///
/// ```
/// use zenthra_core::CustomerKey;
///
/// let key = CustomerKey::from_contact(" Jane@Example.COM ", "+1 (555) 010-9999").unwrap();
/// assert_eq!(key.as_str(), "jane@example.com::15550109999");
/// assert_eq!(key.email(), "jane@example.com");
/// assert_eq!(key.phone(), "15550109999");
///
/// assert!(CustomerKey::from_contact("  ", "ext.").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerKey(String);

impl CustomerKey {
    /// Build a key from raw contact fields, normalizing both halves.
    ///
    /// Returns `None` when both halves normalize to the empty string,
    /// i.e. the order cannot be attributed to any customer.
    #[must_use]
    pub fn from_contact(email: &str, phone: &str) -> Option<Self> {
        let email = normalize_email(email);
        let phone = normalize_phone(phone);
        if email.is_empty() && phone.is_empty() {
            return None;
        }
        Some(Self(format!("{email}{SEPARATOR}{phone}")))
    }

    /// Returns the composite key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns the composite string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the normalized email half (may be empty).
    #[must_use]
    pub fn email(&self) -> &str {
        self.0.split_once(SEPARATOR).map_or("", |(email, _)| email)
    }

    /// Returns the normalized phone half (may be empty).
    #[must_use]
    pub fn phone(&self) -> &str {
        self.0.split_once(SEPARATOR).map_or("", |(_, phone)| phone)
    }
}

impl fmt::Display for CustomerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CustomerKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
