//! Shared types for the storefront
//!
//! Product normalization, cart lines, order payloads, payment methods and
//! receipts, plus small formatting and parsing helpers.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    ApiOrder, ApiProduct, CartLine, OrderItemPayload, OrderPayload, ParsePaymentMethodError,
    PaymentMethod, Product, PublishStatus, Receipt, normalize_catalog, normalize_product,
};
