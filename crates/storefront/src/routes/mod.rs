//! HTTP route handlers for the marketplace.
//!
//! Every route is scoped to a Saleor channel and answers with JSON.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                   - Liveness check
//! GET  /health/ready                             - Readiness check (database)
//!
//! # Catalog
//! GET  /{channel}/marketplace                    - Offering listing (facets, sort, q)
//! GET  /{channel}/marketplace/{category}         - Category landing
//! GET  /{channel}/marketplace/{category}/{slug}  - Offering detail
//! GET  /{channel}/solutions/{role}               - Role landing
//! GET  /{channel}/outcomes/{outcome}             - Outcome landing
//! GET  /{channel}/capabilities/{capability}      - Capability landing
//!
//! # Cart
//! GET  /{channel}/cart                           - Current checkout
//! POST /{channel}/cart/add                       - Add one unit (form: variant_id)
//! POST /{channel}/cart/remove                    - Remove a line (form: line_id)
//! POST /{channel}/cart/checkout                  - Add one unit, redirect to checkout
//! ```

pub mod cart;
pub mod catalog;
pub mod offerings;

use axum::{
    Router,
    routing::{get, post},
};

use agent_marketplace_core::ChannelSlug;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the marketplace catalog routes router.
pub fn marketplace_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(catalog::index))
        .route("/{category}", get(catalog::category))
        .route("/{category}/{slug}", get(offerings::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
}

/// Create all routes for the marketplace.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/{channel}/marketplace", marketplace_routes())
        .route("/{channel}/solutions/{role}", get(catalog::role))
        .route("/{channel}/outcomes/{outcome}", get(catalog::outcome))
        .route(
            "/{channel}/capabilities/{capability}",
            get(catalog::capability),
        )
        .nest("/{channel}/cart", cart_routes())
}

/// Resolve a channel path segment to an active Saleor channel.
///
/// # Errors
///
/// Returns `AppError::NotFound` for unknown or inactive channels.
pub async fn active_channel(state: &AppState, slug: &str) -> Result<ChannelSlug> {
    let slug = ChannelSlug::new(slug);
    match state.saleor().channel(&slug).await? {
        Some(channel) if channel.is_active => Ok(channel.slug),
        Some(_) => Err(AppError::NotFound(format!("channel {slug} is inactive"))),
        None => Err(AppError::NotFound(format!("channel {slug}"))),
    }
}
