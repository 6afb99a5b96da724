//! Seams between the checkout manager and the outside world.

use async_trait::async_trait;

use agent_marketplace_core::{ChannelSlug, Checkout, CheckoutId, CheckoutLineId, VariantId};

use super::CheckoutError;
use crate::saleor::SaleorError;

/// An initial line for a new checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCheckoutLine {
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// Checkout operations of the commerce backend.
///
/// Field-level rejections are reported as [`SaleorError::UserError`].
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_checkout(
        &self,
        channel: &ChannelSlug,
        email: Option<&str>,
        lines: &[NewCheckoutLine],
    ) -> Result<CheckoutId, SaleorError>;

    /// `None` when the backend does not know the checkout (expired or never
    /// existed).
    async fn fetch_checkout(&self, id: &CheckoutId) -> Result<Option<Checkout>, SaleorError>;

    /// Add one unit of `variant_id`.
    async fn add_line(&self, id: &CheckoutId, variant_id: &VariantId)
    -> Result<Checkout, SaleorError>;

    async fn delete_lines(
        &self,
        id: &CheckoutId,
        line_ids: &[CheckoutLineId],
    ) -> Result<Checkout, SaleorError>;
}

/// Per-visitor storage of checkout ids, keyed by channel.
///
/// `set` must be durable when it returns: the manager relies on the id being
/// recorded before it mutates the checkout.
#[async_trait]
pub trait CheckoutIdStore: Send + Sync {
    async fn get(&self, channel: &ChannelSlug) -> Result<Option<CheckoutId>, CheckoutError>;

    async fn set(&self, channel: &ChannelSlug, id: &CheckoutId) -> Result<(), CheckoutError>;
}
