//! Session-related types.
//!
//! The only visitor state the marketplace keeps is the id of each channel's
//! checkout; everything else lives in Saleor.

use agent_marketplace_core::ChannelSlug;

/// Session keys for checkout state.
pub mod keys {
    use super::ChannelSlug;

    /// Prefix of the per-channel checkout id key.
    pub const CHECKOUT_ID_PREFIX: &str = "checkout_id:";

    /// Key for storing the checkout id of `channel`.
    #[must_use]
    pub fn checkout_id(channel: &ChannelSlug) -> String {
        format!("{CHECKOUT_ID_PREFIX}{channel}")
    }
}
