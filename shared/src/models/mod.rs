//! Data models
//!
//! Shared between the storefront client and the command-line front-end.
//! Wire types (`Api*`) stay at the API boundary; everything downstream works
//! with the canonical types.

pub mod cart;
pub mod order;
pub mod product;
pub mod receipt;

// Re-exports
pub use cart::*;
pub use order::*;
pub use product::*;
pub use receipt::*;
