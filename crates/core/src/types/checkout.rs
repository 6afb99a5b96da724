//! Checkout value types shared between the backend client and the session
//! manager.

use serde::{Deserialize, Serialize};

use super::id::{ChannelSlug, CheckoutId, CheckoutLineId, VariantId};

/// The checkout a visitor accumulates lines into, one per (visitor, channel).
///
/// Only the identity lives here; lines are always read back from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: CheckoutId,
    pub channel: ChannelSlug,
}

/// A single line of a checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub line_id: CheckoutLineId,
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// A checkout as reported by the commerce backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub id: CheckoutId,
    pub channel: ChannelSlug,
    pub lines: Vec<CheckoutLine>,
}

impl Checkout {
    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Whether `line_id` belongs to this checkout.
    #[must_use]
    pub fn contains_line(&self, line_id: &CheckoutLineId) -> bool {
        self.lines.iter().any(|line| &line.line_id == line_id)
    }

    /// Quantity of `variant_id` across all lines of this checkout.
    #[must_use]
    pub fn quantity_of(&self, variant_id: &VariantId) -> u32 {
        self.lines
            .iter()
            .filter(|line| &line.variant_id == variant_id)
            .map(|line| line.quantity)
            .sum()
    }
}
