//! Line-item payload normalization.
//!
//! An order's `products` field has accumulated four shapes over the life
//! of the store: a plain JSON array, a JSON-encoded string, a
//! double-quoted CSV-escaped JSON string (spreadsheet exports re-imported
//! through the admin), and occasionally a bare object. [`parse_items`]
//! decodes all of them into a flat list of object items and never fails:
//! anything unrecognizable is the empty list.
//!
//! Field extraction from the decoded items is equally forgiving.
//! [`RawItem`] tries an ordered list of keys for each field, so the
//! priority order (`productId`, then `product_id`, then `id`, and so on)
//! stays in one place instead of being scattered through the fold.

use serde_json::Value;

use zenthra_core::coerce_number;

/// Display name used when an item carries no usable name.
pub const FALLBACK_PRODUCT_NAME: &str = "Unknown Product";

/// Key fallbacks for the product id, tried in order.
const PRODUCT_ID_KEYS: &[&str] = &["productId", "product_id", "id"];

/// Key fallbacks for the quantity, tried in order.
const QUANTITY_KEYS: &[&str] = &["quantity", "totalQuantity"];

/// Key fallbacks for the unit price, tried in order. A nested
/// `product.price` is consulted after these.
const UNIT_PRICE_KEYS: &[&str] = &["unitPrice", "totalRevenue", "price"];

/// Outcome of decoding an order's raw line-item payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedItems {
    /// The payload decoded to a list of object items.
    Items(Vec<Value>),
    /// The payload was absent, malformed, or not list-shaped.
    Empty,
}

impl ParsedItems {
    /// The decoded items, empty for [`ParsedItems::Empty`].
    #[must_use]
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            Self::Items(items) => items,
            Self::Empty => Vec::new(),
        }
    }

    /// Number of decoded items.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Empty => 0,
        }
    }

    /// Whether no items were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a raw `products` payload into a list of object items.
///
/// Attempts, in order: the value is already an array; the value is a
/// string (unwrap one layer of matching quotes, collapse CSV-doubled
/// `""` to `"`, then parse as JSON); anything else. Non-object entries
/// are dropped from decoded arrays. Never fails - a payload this
/// function cannot make sense of is an order with no items, by design.
#[must_use]
pub fn parse_items(raw: &Value) -> ParsedItems {
    match raw {
        Value::Array(entries) => ParsedItems::Items(filter_objects(entries)),
        Value::String(s) => parse_string_payload(s),
        _ => ParsedItems::Empty,
    }
}

fn filter_objects(entries: &[Value]) -> Vec<Value> {
    entries
        .iter()
        .filter(|entry| entry.is_object())
        .cloned()
        .collect()
}

fn parse_string_payload(raw: &str) -> ParsedItems {
    let mut s = raw.trim().to_owned();
    if s.is_empty() {
        return ParsedItems::Empty;
    }

    // One layer of wrapping quotes: prefer a proper JSON string unwrap,
    // fall back to slicing the quote characters off.
    let double_wrapped = s.len() >= 2 && s.starts_with('"') && s.ends_with('"');
    let single_wrapped = s.len() >= 2 && s.starts_with('\'') && s.ends_with('\'');
    if double_wrapped || single_wrapped {
        s = serde_json::from_str::<String>(&s).unwrap_or_else(|_| {
            s.get(1..s.len() - 1).unwrap_or_default().to_owned()
        });
    }

    // CSV escaping doubles interior quotes; collapse them back.
    if s.contains("\"\"") {
        s = s.replace("\"\"", "\"");
    }

    match serde_json::from_str::<Value>(&s) {
        Ok(Value::Array(entries)) => ParsedItems::Items(filter_objects(&entries)),
        Ok(_) => ParsedItems::Empty,
        Err(err) => {
            tracing::debug!(error = %err, "unparseable line-item payload, treating as empty");
            ParsedItems::Empty
        }
    }
}

/// A loosely-typed line item from a decoded payload.
///
/// Wraps the raw JSON object and exposes the field-extraction rules the
/// rollup applies when consuming normalizer output.
#[derive(Debug, Clone, Copy)]
pub struct RawItem<'a> {
    value: &'a Value,
}

impl<'a> RawItem<'a> {
    /// Wrap a decoded item.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// First present, non-null value among `keys`.
    fn first_present(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.value.get(*key))
            .find(|value| !value.is_null())
    }

    /// Non-null nested `product.<key>` value.
    fn nested_product_field(&self, key: &str) -> Option<&'a Value> {
        self.value
            .get("product")
            .and_then(|product| product.get(key))
            .filter(|value| !value.is_null())
    }

    /// Product id from `productId`, `product_id`, or `id`.
    ///
    /// String ids pass through, numeric ids are stringified; anything
    /// else (including the empty string) makes the item unusable for
    /// per-product tallies.
    #[must_use]
    pub fn product_id(&self) -> Option<String> {
        match self.first_present(PRODUCT_ID_KEYS)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Quantity from `quantity` or `totalQuantity`, when finite and
    /// strictly positive.
    #[must_use]
    pub fn quantity(&self) -> Option<f64> {
        let quantity = coerce_number(self.first_present(QUANTITY_KEYS)?)?;
        (quantity.is_finite() && quantity > 0.0).then_some(quantity)
    }

    /// Quantity as counted for an order's item count: any finite value,
    /// with no id or positivity requirement, defaulting to 0.
    #[must_use]
    pub fn counted_quantity(&self) -> f64 {
        self.first_present(QUANTITY_KEYS)
            .and_then(coerce_number)
            .filter(|quantity| quantity.is_finite())
            .unwrap_or(0.0)
    }

    /// Unit price from `unitPrice`, `totalRevenue`, `price`, or a nested
    /// `product.price`, defaulting to 0 when absent or malformed.
    #[must_use]
    pub fn unit_price(&self) -> f64 {
        self.first_present(UNIT_PRICE_KEYS)
            .or_else(|| self.nested_product_field("price"))
            .and_then(coerce_number)
            .filter(|price| price.is_finite())
            .unwrap_or(0.0)
    }

    /// Display name from a nested `product.name` or a flat `name`,
    /// trimmed, with [`FALLBACK_PRODUCT_NAME`] when nothing usable is
    /// present.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.nested_product_field("name")
            .or_else(|| self.value.get("name").filter(|value| !value.is_null()))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| FALLBACK_PRODUCT_NAME.to_owned(), str::to_owned)
    }
}
