//! Checkout session management.
//!
//! A visitor accumulates lines into one checkout per channel. The checkout
//! lives in Saleor; only its id is kept on the visitor's side, behind
//! [`CheckoutIdStore`].

mod manager;
mod ports;

pub use manager::{CheckoutSessionManager, checkout_url};
pub use ports::{CheckoutBackend, CheckoutIdStore, NewCheckoutLine};

use thiserror::Error;

use agent_marketplace_core::{ChannelSlug, CheckoutLineId};

use crate::saleor::SaleorError;

/// Errors from checkout session operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The backend could not be reached or returned an unusable response.
    #[error("Checkout backend error: {0}")]
    Backend(SaleorError),

    /// The backend refused the mutation; carries its message unchanged.
    #[error("{0}")]
    Rejected(String),

    /// No checkout is recorded for this channel, or the recorded one is gone.
    #[error("No checkout session for channel {channel}")]
    NoSession { channel: ChannelSlug },

    /// The line does not belong to the visitor's checkout.
    #[error("Line {line_id} is not in the checkout session")]
    LineNotInSession { line_id: CheckoutLineId },

    /// Reading or writing the checkout id failed.
    #[error("Checkout id store error: {0}")]
    Store(String),
}

impl From<SaleorError> for CheckoutError {
    fn from(err: SaleorError) -> Self {
        match err {
            SaleorError::UserError(message) => Self::Rejected(message),
            other => Self::Backend(other),
        }
    }
}
