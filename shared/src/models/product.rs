//! Product Model
//!
//! [`ApiProduct`] mirrors the loosely-typed backend record; [`Product`] is the
//! canonical shape used by the cart and catalog. [`normalize_product`] is the
//! only way from one to the other.

use serde::{Deserialize, Serialize};

use crate::util::{
    deserialize_lenient, deserialize_lenient_id, deserialize_lenient_number,
    deserialize_lenient_quantity, deserialize_lenient_string, finite_or_zero,
};

/// Name used when the backend omits one.
pub const DEFAULT_PRODUCT_NAME: &str = "Untitled Product";
/// Description used when the backend omits one.
pub const DEFAULT_PRODUCT_DESCRIPTION: &str = "Premium skincare created with care";
/// Category used when the backend omits one.
pub const DEFAULT_CATEGORY: &str = "skincare";

/// Backend flag gating catalog visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Yes,
    No,
    /// Any value other than `yes`/`no`
    #[serde(other)]
    Unknown,
}

/// Product record as returned by `GET /api/products`
///
/// Every field is optional and a field of the wrong type degrades to `None`
/// on its own; ids may arrive as strings or numbers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_lenient_id")]
    pub mongo_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_id")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub notes: Option<String>,
    /// String-typed upstream; numbers are accepted as well
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub product_image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub expiring_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_quantity")]
    pub quantity: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient")]
    pub publish_status: Option<PublishStatus>,
}

impl ApiProduct {
    /// Deserialize one record. Only a non-object entry degrades to an empty
    /// record, which normalizes to an unpublished product and is dropped by
    /// the catalog filter rather than failing the whole batch.
    pub fn from_value_lossy(value: serde_json::Value, index: usize) -> Self {
        if !value.is_object() {
            tracing::warn!(index, "Discarding product record that is not an object");
            return Self::default();
        }
        match serde_json::from_value(value) {
            Ok(product) => product,
            Err(e) => {
                tracing::warn!(index, error = %e, "Discarding malformed product record");
                Self::default()
            }
        }
    }
}

/// Canonical product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Price in currency unit, always finite and non-negative
    pub price: f64,
    pub image: Option<String>,
    pub category: String,
    pub product_id: Option<String>,
    pub expiring_date: Option<String>,
    pub publish_status: Option<PublishStatus>,
}

impl Product {
    /// Whether the product may be shown in the catalog.
    pub fn is_publishable(&self) -> bool {
        !self.name.is_empty() && self.publish_status == Some(PublishStatus::Yes)
    }

    /// Identifier sent to the backend in order lines.
    pub fn order_product_id(&self) -> &str {
        self.product_id.as_deref().unwrap_or(&self.id)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Normalize a raw record into a [`Product`].
///
/// Total: never fails. The id falls back through `id`, `_id`, `productId`
/// and finally `product-<index>`, so ids stay distinct within a batch.
pub fn normalize_product(raw: ApiProduct, index: usize) -> Product {
    let product_id = non_empty(raw.product_id);
    let id = non_empty(raw.id)
        .or_else(|| non_empty(raw.mongo_id))
        .or_else(|| product_id.clone())
        .unwrap_or_else(|| format!("product-{index}"));

    let price = raw.price.map(finite_or_zero).unwrap_or(0.0).max(0.0);

    Product {
        id,
        name: raw.product_name.unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string()),
        description: raw
            .notes
            .unwrap_or_else(|| DEFAULT_PRODUCT_DESCRIPTION.to_string()),
        price,
        image: non_empty(raw.product_image),
        category: raw.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        product_id,
        expiring_date: raw.expiring_date,
        publish_status: raw.publish_status,
    }
}

/// Normalize a fetched batch and keep only publishable products.
pub fn normalize_catalog(raw: Vec<ApiProduct>) -> Vec<Product> {
    raw.into_iter()
        .enumerate()
        .map(|(index, product)| normalize_product(product, index))
        .filter(Product::is_publishable)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> ApiProduct {
        ApiProduct::from_value_lossy(value, 0)
    }

    #[test]
    fn test_missing_price_is_zero() {
        let product = normalize_product(raw(json!({"productName": "Serum"})), 0);
        assert_eq!(product.price, 0.0);
    }

    #[test]
    fn test_unparseable_price_is_zero() {
        for price in [json!("abc"), json!("NaN"), json!("inf"), json!(""), json!(null)] {
            let product = normalize_product(raw(json!({"productName": "Serum", "price": price})), 0);
            assert_eq!(product.price, 0.0);
            assert!(!product.price.is_nan());
        }
    }

    #[test]
    fn test_string_and_numeric_price() {
        let a = normalize_product(raw(json!({"price": "120.50"})), 0);
        let b = normalize_product(raw(json!({"price": 80})), 0);
        assert_eq!(a.price, 120.5);
        assert_eq!(b.price, 80.0);
    }

    #[test]
    fn test_index_fallback_ids_are_distinct() {
        let first = normalize_product(raw(json!({"productName": "A"})), 0);
        let second = normalize_product(raw(json!({"productName": "B"})), 1);
        assert_eq!(first.id, "product-0");
        assert_eq!(second.id, "product-1");
    }

    #[test]
    fn test_id_fallback_chain() {
        let with_id = normalize_product(raw(json!({"id": "a", "_id": "b", "productId": "c"})), 0);
        let with_mongo = normalize_product(raw(json!({"_id": "b", "productId": "c"})), 0);
        let with_product_id = normalize_product(raw(json!({"productId": "c"})), 0);
        assert_eq!(with_id.id, "a");
        assert_eq!(with_mongo.id, "b");
        assert_eq!(with_product_id.id, "c");
        assert_eq!(with_product_id.product_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_defaults() {
        let product = normalize_product(ApiProduct::default(), 3);
        assert_eq!(product.name, DEFAULT_PRODUCT_NAME);
        assert_eq!(product.description, DEFAULT_PRODUCT_DESCRIPTION);
        assert_eq!(product.category, DEFAULT_CATEGORY);
        assert!(product.image.is_none());
        assert!(product.publish_status.is_none());
    }

    #[test]
    fn test_bad_field_degrades_alone() {
        let product = raw(json!({"productName": 42, "publishStatus": "yes"}));
        assert!(product.product_name.is_none());
        assert_eq!(product.publish_status, Some(PublishStatus::Yes));

        let product = raw(json!({"productName": "A", "publishStatus": true}));
        assert_eq!(product.product_name.as_deref(), Some("A"));
        assert!(product.publish_status.is_none());
    }

    #[test]
    fn test_numeric_id_and_object_image_keep_product() {
        let batch = vec![
            raw(json!({"id": 42, "productName": "Glow Serum", "price": "150", "publishStatus": "yes"})),
            raw(json!({
                "_id": "b7",
                "productName": "Rose Cream",
                "productImage": {"url": "x"},
                "publishStatus": "yes"
            })),
        ];
        let products = normalize_catalog(batch);
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "42");
        assert_eq!(products[0].price, 150.0);
        assert_eq!(products[1].id, "b7");
        assert!(products[1].image.is_none());
    }

    #[test]
    fn test_non_object_record_degrades_to_empty() {
        let product = raw(json!(["not", "a", "record"]));
        assert!(product.id.is_none());
        assert!(normalize_catalog(vec![product]).is_empty());
    }

    #[test]
    fn test_unknown_publish_status() {
        let product = raw(json!({"productName": "A", "publishStatus": "maybe"}));
        assert_eq!(product.publish_status, Some(PublishStatus::Unknown));
    }

    #[test]
    fn test_normalize_catalog_filters_unpublished() {
        let batch = vec![
            raw(json!({"id": "1", "productName": "Shown", "price": "10", "publishStatus": "yes"})),
            raw(json!({"id": "2", "productName": "Hidden", "price": "10", "publishStatus": "no"})),
            raw(json!({"id": "3", "productName": "", "price": "10", "publishStatus": "yes"})),
            raw(json!({"id": "4", "productName": "NoStatus", "price": "10"})),
        ];
        let products = normalize_catalog(batch);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "1");
    }
}
