//! Storefront Client - catalog, cart and checkout for the storefront backend
//!
//! Provides the HTTP API client, the session-scoped cart store, the catalog
//! loader and the checkout workflow that submits orders.

pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod http;
pub mod storage;

pub use api::StorefrontApi;
pub use cart::CartStore;
pub use catalog::{CatalogFilter, CatalogLoader, CatalogState, LoadOutcome, PriceRange};
pub use checkout::{CheckoutForm, CheckoutPhase, CheckoutWorkflow, SubmitOutcome};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{ApiRequest, HttpClient, NetworkHttpClient};
pub use storage::SessionStorage;

// Re-export shared types for convenience
pub use shared::models::{CartLine, PaymentMethod, Product, Receipt};
