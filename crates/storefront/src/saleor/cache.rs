//! Cache types for Saleor API responses.

use agent_marketplace_core::offering::RawProduct;

use super::types::{Channel, ProductPage};

/// Cached value types. Checkouts are never cached.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(ProductPage),
    Product(Box<RawProduct>),
    /// `None` records a channel the backend does not know.
    Channel(Option<Channel>),
}
