//! HTTP client for the record store's REST API.
//!
//! The store exposes collections under `/api/collections/<name>/records`
//! with page-based listing (`page`, `perPage`), a `filter` expression,
//! relation expansion (`expand`), and sorting. Reads authenticate with a
//! bearer-style token in the `Authorization` header when one is
//! configured.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use zenthra_core::OrderRecord;

use crate::config::StoreConfig;

use super::{OrderQuery, OrderStore, StoreError};

/// Collection holding order records.
const ORDERS_COLLECTION: &str = "orders";

/// Records fetched per page while draining a full list.
const PAGE_SIZE: u32 = 500;

/// Client for the record store's REST API.
///
/// Cheap to clone; the underlying HTTP client and configuration are
/// shared.
#[derive(Clone)]
pub struct RecordStoreClient {
    inner: Arc<RecordStoreClientInner>,
}

struct RecordStoreClientInner {
    client: reqwest::Client,
    records_url: Url,
    token: Option<SecretString>,
}

/// One page of a record list response.
#[derive(Debug, Deserialize)]
struct RecordPage {
    #[serde(rename = "totalPages")]
    total_pages: u32,
    items: Vec<OrderRecord>,
}

impl RecordStoreClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the base URL
    /// cannot address a collection.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let records_url = config
            .base_url
            .join(&format!("api/collections/{ORDERS_COLLECTION}/records"))?;

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(RecordStoreClientInner {
                client,
                records_url,
                token: config.token.clone(),
            }),
        })
    }

    async fn fetch_page(&self, query: &OrderQuery, page: u32) -> Result<RecordPage, StoreError> {
        let mut url = self.inner.records_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("page", &page.to_string());
            pairs.append_pair("perPage", &PAGE_SIZE.to_string());
            pairs.append_pair("sort", "-created");
            if let Some(filter) = query.filter_expression() {
                pairs.append_pair("filter", &filter);
            }
            if query.expand_account {
                pairs.append_pair("expand", "user_id");
            }
        }

        let mut request = self.inner.client.get(url);
        if let Some(token) = &self.inner.token {
            request = request.header(AUTHORIZATION, token.expose_secret());
        }

        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, StoreError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized(format!(
                "store rejected the request with status {status}"
            )));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl OrderStore for RecordStoreClient {
    /// Drain every page of the order collection into one list.
    #[instrument(skip(self))]
    async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<OrderRecord>, StoreError> {
        let mut orders = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(query, page).await?;
            let total_pages = batch.total_pages;
            orders.extend(batch.items);

            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = orders.len(), "fetched order records");
        Ok(orders)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_record_page_parses_store_response() {
        let page: RecordPage = serde_json::from_str(
            r#"{
                "page": 1,
                "perPage": 500,
                "totalItems": 2,
                "totalPages": 1,
                "items": [
                    {"id": "rec_1", "payment_status": "paid", "total": 10},
                    {"id": "rec_2", "total": "5.5"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.total_pages, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items.first().unwrap().id, "rec_1");
        assert_eq!(page.items.last().unwrap().total, Some(5.5));
    }

    #[test]
    fn test_records_url_from_base() {
        let config = StoreConfig {
            base_url: Url::parse("http://127.0.0.1:8090/").unwrap(),
            token: None,
        };
        let client = RecordStoreClient::new(&config).unwrap();
        assert_eq!(
            client.inner.records_url.as_str(),
            "http://127.0.0.1:8090/api/collections/orders/records"
        );
    }
}
