//! Catalog API client.
//!
//! Plain REST JSON client built on `reqwest`, with listings cached using
//! `moka` (5-minute TTL). Responses are parsed leniently; see [`types`]
//! for the record-to-domain conversions.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use cedar_market_core::{OfferId, ProductId};
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

pub use types::{AuthResponse, AuthUser, Offer, OrderRequest, OrderUser, Product};

use types::{OfferRecord, ProductRecord};

const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const PRODUCTS_CACHE_KEY: &str = "products";
const OFFERS_CACHE_KEY: &str = "offers";

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Transport-level failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Cached listing values.
#[derive(Clone)]
enum CacheValue {
    Products(Arc<Vec<Product>>),
    Offers(Arc<Vec<Offer>>),
}

/// Client for the catalog API.
///
/// Product and offer listings are cached for 5 minutes; auth and order
/// calls always go to the network.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog client for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        read_json(response).await
    }

    /// Fetch the product listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body cannot be
    /// parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(PRODUCTS_CACHE_KEY).await
        {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let records: Vec<ProductRecord> = self.get_json("/products").await?;
        let products: Vec<Product> = records
            .into_iter()
            .filter_map(Product::from_record)
            .collect();

        self.inner
            .cache
            .insert(
                PRODUCTS_CACHE_KEY.to_string(),
                CacheValue::Products(Arc::new(products.clone())),
            )
            .await;

        Ok(products)
    }

    /// Fetch the special offers listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the body cannot be
    /// parsed.
    #[instrument(skip(self))]
    pub async fn offers(&self) -> Result<Vec<Offer>, CatalogError> {
        if let Some(CacheValue::Offers(offers)) = self.inner.cache.get(OFFERS_CACHE_KEY).await {
            debug!("Cache hit for offers");
            return Ok(offers.as_ref().clone());
        }

        let records: Vec<OfferRecord> = self.get_json("/offers").await?;
        let offers: Vec<Offer> = records.into_iter().filter_map(Offer::from_record).collect();

        self.inner
            .cache
            .insert(
                OFFERS_CACHE_KEY.to_string(),
                CacheValue::Offers(Arc::new(offers.clone())),
            )
            .await;

        Ok(offers)
    }

    /// Look up a single product by id in the (cached) listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the listing cannot be fetched.
    pub async fn find_product(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        Ok(self.products().await?.into_iter().find(|p| p.id == id))
    }

    /// Look up a single offer by id in the (cached) listing.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the listing cannot be fetched.
    pub async fn find_offer(&self, id: OfferId) -> Result<Option<Offer>, CatalogError> {
        Ok(self.offers().await?.into_iter().find(|o| o.id == id))
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` with the API's message when registration
    /// is rejected (e.g., email already in use).
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, CatalogError> {
        let body = serde_json::json!({
            "name": name,
            "email": email,
            "password": password,
        });
        let response = self
            .inner
            .client
            .post(self.url("/auth/register"))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }

    /// Exchange credentials for a session.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Api` when the credentials are rejected.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, CatalogError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        let response = self
            .inner
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        read_json(response).await
    }

    /// Submit an order for fulfilment by email.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request fails or the API rejects the
    /// order.
    #[instrument(skip(self, order), fields(items = order.items.len()))]
    pub async fn submit_order(&self, order: &OrderRequest<'_>) -> Result<(), CatalogError> {
        let response = self
            .inner
            .client
            .post(self.url("/orders/email"))
            .json(order)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(CatalogError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| CatalogError::Parse(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = CatalogClient::new("https://api.example.com/api/").unwrap();
        assert_eq!(
            client.url("/products"),
            "https://api.example.com/api/products"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = CatalogError::Api {
            status: 503,
            message: "down for maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - down for maintenance");
    }
}
