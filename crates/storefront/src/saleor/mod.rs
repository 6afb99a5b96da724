//! Saleor GraphQL API client.
//!
//! # Architecture
//!
//! - Uses `graphql_client` request/response envelopes with hand-written
//!   operation documents (see [`queries`])
//! - Saleor is source of truth - NO local copy of the catalog or checkouts
//! - In-memory caching via `moka` for catalog queries and channel lookups;
//!   checkout calls are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_marketplace_storefront::saleor::{ProductListing, SaleorClient};
//!
//! let client = SaleorClient::new(&config.saleor)?;
//!
//! let page = client.list_products(&channel, &ProductListing::default()).await?;
//! let product = client.product_by_slug(&channel, "support-bot").await?;
//! ```

mod cache;
mod client;
mod conversions;
pub mod queries;
pub mod types;

pub use client::SaleorClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when talking to Saleor.
#[derive(Debug, Error)]
pub enum SaleorError {
    /// HTTP request failed (includes request timeouts).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Saleor.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Field errors from a mutation (e.g., variant out of stock).
    #[error("User error: {0}")]
    UserError(String),
}

/// A GraphQL error returned by the Saleor API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    pub message: String,
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

impl GraphQLError {
    /// An error with only a message, for failures detected client-side.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
            path: Vec::new(),
        }
    }
}

/// Location in a GraphQL document where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}
