//! Cart route handlers.
//!
//! The cart is the visitor's Saleor checkout for the channel. Its id lives in
//! the session; lines are always read back from Saleor.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use agent_marketplace_core::{ChannelSlug, Checkout, CheckoutId, CheckoutLine, CheckoutLineId, VariantId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::state::AppState;

use super::active_channel;

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub channel: ChannelSlug,
    pub checkout_id: Option<CheckoutId>,
    pub lines: Vec<CheckoutLine>,
    pub total_quantity: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub const fn empty(channel: ChannelSlug) -> Self {
        Self {
            channel,
            checkout_id: None,
            lines: Vec::new(),
            total_quantity: 0,
        }
    }
}

impl From<Checkout> for CartView {
    fn from(checkout: Checkout) -> Self {
        Self {
            total_quantity: checkout.total_quantity(),
            channel: checkout.channel,
            checkout_id: Some(checkout.id),
            lines: checkout.lines,
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddLineForm {
    pub variant_id: String,
}

impl AddLineForm {
    fn variant_id(&self) -> Result<VariantId> {
        let id = self.variant_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("variant_id is required".to_string()));
        }
        Ok(VariantId::new(id))
    }
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub line_id: String,
}

impl RemoveLineForm {
    fn line_id(&self) -> Result<CheckoutLineId> {
        let id = self.line_id.trim();
        if id.is_empty() {
            return Err(AppError::BadRequest("line_id is required".to_string()));
        }
        Ok(CheckoutLineId::new(id))
    }
}

/// Display the cart. Never creates a checkout.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    session: Session,
) -> Result<Json<CartView>> {
    let channel = active_channel(&state, &channel).await?;

    let cart = state
        .checkout(session)
        .current(&channel)
        .await?
        .map_or_else(|| CartView::empty(channel), CartView::from);

    Ok(Json(cart))
}

/// Add one unit of a variant to the cart.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    session: Session,
    Form(form): Form<AddLineForm>,
) -> Result<Json<CartView>> {
    let channel = active_channel(&state, &channel).await?;
    let variant_id = form.variant_id()?;

    add_breadcrumb(
        "checkout",
        "Add line",
        Some(&[("channel", channel.as_str()), ("variant_id", variant_id.as_str())]),
    );

    let checkout = state
        .checkout(session)
        .add_line(&channel, &variant_id)
        .await?;

    Ok(Json(CartView::from(checkout)))
}

/// Remove a line from the cart.
#[instrument(skip(state, session, form))]
pub async fn remove(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    session: Session,
    Form(form): Form<RemoveLineForm>,
) -> Result<Json<CartView>> {
    let channel = active_channel(&state, &channel).await?;
    let line_id = form.line_id()?;

    add_breadcrumb(
        "checkout",
        "Remove line",
        Some(&[("channel", channel.as_str()), ("line_id", line_id.as_str())]),
    );

    let checkout = state
        .checkout(session)
        .remove_line(&channel, &line_id)
        .await?;

    Ok(Json(CartView::from(checkout)))
}

/// Add one unit and redirect to the checkout page.
#[instrument(skip(state, session, form))]
pub async fn checkout(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    session: Session,
    Form(form): Form<AddLineForm>,
) -> Result<Redirect> {
    let channel = active_channel(&state, &channel).await?;
    let variant_id = form.variant_id()?;

    add_breadcrumb(
        "checkout",
        "Buy now",
        Some(&[("channel", channel.as_str()), ("variant_id", variant_id.as_str())]),
    );

    let target = state
        .checkout(session)
        .add_line_and_redirect(&channel, &variant_id)
        .await?;

    Ok(Redirect::to(&target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_view_from_checkout() {
        let checkout = Checkout {
            id: CheckoutId::new("checkout-1"),
            channel: ChannelSlug::new("default-channel"),
            lines: vec![
                CheckoutLine {
                    line_id: CheckoutLineId::new("line-1"),
                    variant_id: VariantId::new("variant-pro"),
                    quantity: 2,
                },
                CheckoutLine {
                    line_id: CheckoutLineId::new("line-2"),
                    variant_id: VariantId::new("variant-team"),
                    quantity: 1,
                },
            ],
        };

        let view = CartView::from(checkout);

        assert_eq!(view.total_quantity, 3);
        assert_eq!(view.checkout_id, Some(CheckoutId::new("checkout-1")));
        assert_eq!(view.lines.len(), 2);
    }

    #[test]
    fn test_empty_cart() {
        let view = CartView::empty(ChannelSlug::new("default-channel"));

        assert_eq!(view.total_quantity, 0);
        assert!(view.checkout_id.is_none());
        assert!(view.lines.is_empty());
    }

    #[test]
    fn test_blank_form_ids_are_bad_requests() {
        let form = AddLineForm {
            variant_id: "  ".to_string(),
        };
        assert!(matches!(form.variant_id(), Err(AppError::BadRequest(_))));

        let form = RemoveLineForm {
            line_id: String::new(),
        };
        assert!(matches!(form.line_id(), Err(AppError::BadRequest(_))));
    }
}
