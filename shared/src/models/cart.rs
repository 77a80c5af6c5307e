//! Cart line

use serde::{Deserialize, Serialize};

use super::product::Product;

/// One product paired with a quantity (always >= 1 inside a cart)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    /// `price × quantity`
    pub fn line_total(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}
