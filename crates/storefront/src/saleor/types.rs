//! Request and result types for Saleor catalog operations.

use serde::{Deserialize, Serialize};

use agent_marketplace_core::ChannelSlug;
use agent_marketplace_core::catalog::AttributeFilter;
use agent_marketplace_core::offering::RawProduct;

/// Number of products fetched per listing page.
pub const LISTING_PAGE_SIZE: i64 = 20;

/// Listing sort order. Both sort ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSort {
    #[default]
    Name,
    Price,
}

impl ProductSort {
    /// Parse the `sort` query parameter. Unknown values sort by name.
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("price") => Self::Price,
            _ => Self::Name,
        }
    }

    /// Saleor `ProductOrderField` value.
    #[must_use]
    pub const fn order_field(self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Price => "PRICE",
        }
    }
}

/// Parameters of a product listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    /// Compiled attribute filter; `None` omits the filter argument.
    pub attributes: Option<AttributeFilter>,
    /// Free-text search.
    pub search: Option<String>,
    pub sort: ProductSort,
    pub first: i64,
}

impl Default for ProductListing {
    fn default() -> Self {
        Self {
            attributes: None,
            search: None,
            sort: ProductSort::default(),
            first: LISTING_PAGE_SIZE,
        }
    }
}

impl ProductListing {
    /// Cache key for this listing in `channel`.
    ///
    /// The compiled filter is deterministic, so equal listings serialize to
    /// equal keys.
    #[must_use]
    pub fn cache_key(&self, channel: &ChannelSlug) -> String {
        let attributes = self
            .attributes
            .as_ref()
            .and_then(|filter| serde_json::to_string(filter).ok())
            .unwrap_or_default();
        format!(
            "products:{channel}:{sort:?}:{first}:{search}:{attributes}",
            sort = self.sort,
            first = self.first,
            search = self.search.as_deref().unwrap_or_default(),
        )
    }
}

/// One page of listing results.
#[derive(Debug, Clone, Default)]
pub struct ProductPage {
    /// Total matches across all pages, when the backend reports it.
    pub total_count: Option<i64>,
    pub products: Vec<RawProduct>,
}

/// A sales channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: String,
    pub slug: ChannelSlug,
    pub name: String,
    pub is_active: bool,
    pub currency_code: String,
}
