//! Order store access: the engine's one external collaborator.
//!
//! The aggregation engine never talks to the network itself; it consumes
//! a full order list fetched through the [`OrderStore`] seam. The real
//! implementation is [`RecordStoreClient`]; tests substitute an in-memory
//! store.

mod client;

pub use client::RecordStoreClient;

use thiserror::Error;

use zenthra_core::OrderRecord;

/// Errors that can occur when reading from the record store.
///
/// Any of these aborts the whole aggregation call; no partial report is
/// ever returned.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, as far as it was readable.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A request URL could not be built.
    #[error("Invalid store URL: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication or authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// Query parameters for a full-list order read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderQuery {
    /// Inclusive lower bound on `created`, pushed down as a server-side
    /// filter.
    pub created_after: Option<String>,
    /// Inclusive upper bound on `created`, pushed down as a server-side
    /// filter.
    pub created_before: Option<String>,
    /// Expand the linked-account relation on each record.
    pub expand_account: bool,
}

impl OrderQuery {
    /// Query with the linked-account relation expanded, as the customer
    /// pipelines need.
    #[must_use]
    pub const fn with_account_expansion() -> Self {
        Self {
            created_after: None,
            created_before: None,
            expand_account: true,
        }
    }

    /// Render the created-date window as the store's filter expression,
    /// or `None` when the query is unbounded.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        let mut conditions = Vec::new();
        if let Some(start) = &self.created_after {
            conditions.push(format!("created >= \"{start}\""));
        }
        if let Some(end) = &self.created_before {
            conditions.push(format!("created <= \"{end}\""));
        }
        if conditions.is_empty() {
            None
        } else {
            Some(conditions.join(" && "))
        }
    }
}

/// Read access to the order collection.
pub trait OrderStore {
    /// Fetch the full order list matching `query`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the store is unreachable, rejects the
    /// request, or returns an unreadable response.
    fn list_orders(
        &self,
        query: &OrderQuery,
    ) -> impl Future<Output = Result<Vec<OrderRecord>, StoreError>> + Send;
}
