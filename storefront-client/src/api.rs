//! Storefront backend endpoints
//!
//! [`StorefrontApi`] is the seam the catalog loader and checkout workflow
//! depend on; [`NetworkHttpClient`] implements it over HTTP.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{ApiProduct, OrderPayload};

use crate::http::HttpClient;
use crate::{ClientResult, NetworkHttpClient};

pub const PRODUCTS_PATH: &str = "/api/products";
pub const ORDERS_PATH: &str = "/api/orders";

#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// `GET /api/products`, one raw record per product
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>>;

    /// `POST /api/orders`; the raw body is returned for the caller to
    /// interpret, since the order may be nested or at the top level
    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<serde_json::Value>;
}

#[async_trait]
impl<T: StorefrontApi + ?Sized> StorefrontApi for Arc<T> {
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>> {
        (**self).fetch_products().await
    }

    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<serde_json::Value> {
        (**self).submit_order(payload).await
    }
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Option<Vec<serde_json::Value>>,
}

#[async_trait]
impl StorefrontApi for NetworkHttpClient {
    async fn fetch_products(&self) -> ClientResult<Vec<ApiProduct>> {
        let envelope: ProductsEnvelope = self.get(PRODUCTS_PATH).await?;
        let products: Vec<ApiProduct> = envelope
            .products
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, value)| ApiProduct::from_value_lossy(value, index))
            .collect();
        tracing::debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    async fn submit_order(&self, payload: &OrderPayload) -> ClientResult<serde_json::Value> {
        self.post(ORDERS_PATH, payload).await
    }
}
