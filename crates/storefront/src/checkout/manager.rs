//! Resolve, create and mutate a visitor's checkout.
//!
//! States: no session → resolving → active. A new checkout id is written to
//! the id store before any line is added to it, so a request that fails
//! half-way leaves an empty but reachable checkout rather than an orphan.
//!
//! Two concurrent first requests from one visitor can each create a checkout;
//! the last id written wins and the other checkout is left to expire on the
//! backend.

use tracing::{info, instrument, warn};

use agent_marketplace_core::{
    ChannelSlug, Checkout, CheckoutId, CheckoutLineId, CheckoutSession, VariantId,
};

use super::CheckoutError;
use super::ports::{CheckoutBackend, CheckoutIdStore};

/// Checkout operations for one visitor.
///
/// Session creation is idempotent: once an id is stored for a channel it is
/// reused. Line addition is not: every call adds one more unit.
pub struct CheckoutSessionManager<B, S> {
    backend: B,
    store: S,
}

impl<B, S> CheckoutSessionManager<B, S>
where
    B: CheckoutBackend,
    S: CheckoutIdStore,
{
    pub const fn new(backend: B, store: S) -> Self {
        Self { backend, store }
    }

    /// The visitor's checkout in `channel`, creating it when none is stored.
    ///
    /// The stored id is trusted; it is not checked against the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the id store fails or the backend cannot create a
    /// checkout.
    #[instrument(skip(self), fields(channel = %channel))]
    pub async fn resolve_or_create(
        &self,
        channel: &ChannelSlug,
    ) -> Result<CheckoutSession, CheckoutError> {
        if let Some(id) = self.store.get(channel).await? {
            return Ok(CheckoutSession {
                id,
                channel: channel.clone(),
            });
        }

        self.create_and_persist(channel).await
    }

    /// Create an empty checkout and record its id. There is deliberately no
    /// way to do the first without the second.
    async fn create_and_persist(
        &self,
        channel: &ChannelSlug,
    ) -> Result<CheckoutSession, CheckoutError> {
        let id = self.backend.create_checkout(channel, None, &[]).await?;
        self.store.set(channel, &id).await?;

        info!(checkout_id = %id, "Created checkout session");
        Ok(CheckoutSession {
            id,
            channel: channel.clone(),
        })
    }

    /// Add one unit of `variant_id` to the visitor's checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Rejected` with the backend's message when the
    /// backend refuses the line. The stored id is kept in that case.
    #[instrument(skip(self), fields(channel = %channel, variant_id = %variant_id))]
    pub async fn add_line(
        &self,
        channel: &ChannelSlug,
        variant_id: &VariantId,
    ) -> Result<Checkout, CheckoutError> {
        let session = self.resolve_or_create(channel).await?;

        self.backend
            .add_line(&session.id, variant_id)
            .await
            .map_err(|e| {
                let err = CheckoutError::from(e);
                if let CheckoutError::Rejected(message) = &err {
                    warn!(checkout_id = %session.id, %message, "Checkout line rejected");
                }
                err
            })
    }

    /// Remove a line from the visitor's checkout.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NoSession` when no checkout is stored for the
    /// channel or the backend no longer knows it, and
    /// `CheckoutError::LineNotInSession` when the line belongs to another
    /// checkout.
    #[instrument(skip(self), fields(channel = %channel, line_id = %line_id))]
    pub async fn remove_line(
        &self,
        channel: &ChannelSlug,
        line_id: &CheckoutLineId,
    ) -> Result<Checkout, CheckoutError> {
        let no_session = || CheckoutError::NoSession {
            channel: channel.clone(),
        };

        let id = self.store.get(channel).await?.ok_or_else(no_session)?;
        let checkout = self
            .backend
            .fetch_checkout(&id)
            .await?
            .ok_or_else(no_session)?;

        if !checkout.contains_line(line_id) {
            return Err(CheckoutError::LineNotInSession {
                line_id: line_id.clone(),
            });
        }

        Ok(self
            .backend
            .delete_lines(&id, std::slice::from_ref(line_id))
            .await?)
    }

    /// Add one unit and return the checkout page path for the result.
    ///
    /// # Errors
    ///
    /// Propagates every error of [`Self::add_line`].
    pub async fn add_line_and_redirect(
        &self,
        channel: &ChannelSlug,
        variant_id: &VariantId,
    ) -> Result<String, CheckoutError> {
        let checkout = self.add_line(channel, variant_id).await?;
        Ok(checkout_url(channel, &checkout.id))
    }

    /// The visitor's checkout in `channel`, if one is stored and the backend
    /// still has it. Never creates.
    ///
    /// # Errors
    ///
    /// Returns an error if the id store or the backend fails.
    #[instrument(skip(self), fields(channel = %channel))]
    pub async fn current(&self, channel: &ChannelSlug) -> Result<Option<Checkout>, CheckoutError> {
        match self.store.get(channel).await? {
            Some(id) => Ok(self.backend.fetch_checkout(&id).await?),
            None => Ok(None),
        }
    }
}

/// Path of the checkout page for `id` in `channel`.
#[must_use]
pub fn checkout_url(channel: &ChannelSlug, id: &CheckoutId) -> String {
    format!(
        "/{}/checkout?checkout={}",
        urlencoding::encode(channel.as_str()),
        urlencoding::encode(id.as_str())
    )
}
