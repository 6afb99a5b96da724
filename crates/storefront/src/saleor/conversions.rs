//! Conversions from Saleor response shapes into core types.

use tracing::warn;

use agent_marketplace_core::{
    ChannelSlug, Checkout, CheckoutId, CheckoutLine, CheckoutLineId, VariantId,
};

use super::queries::checkout_fields::{CheckoutFieldError, CheckoutFields, CheckoutLineFields};

pub fn convert_checkout(checkout: CheckoutFields) -> Checkout {
    Checkout {
        id: CheckoutId::new(checkout.id),
        channel: ChannelSlug::new(checkout.channel.slug),
        lines: checkout
            .lines
            .into_iter()
            .filter_map(convert_checkout_line)
            .collect(),
    }
}

fn convert_checkout_line(line: CheckoutLineFields) -> Option<CheckoutLine> {
    let Ok(quantity) = u32::try_from(line.quantity) else {
        warn!(line_id = %line.id, quantity = line.quantity, "Skipping checkout line with invalid quantity");
        return None;
    };
    Some(CheckoutLine {
        line_id: CheckoutLineId::new(line.id),
        variant_id: VariantId::new(line.variant.id),
        quantity,
    })
}

/// Join field errors into one message, `"; "`-separated.
///
/// A single error keeps its message verbatim. Errors without a message fall
/// back to their field and code.
pub fn join_field_errors(errors: &[CheckoutFieldError]) -> String {
    errors
        .iter()
        .map(|e| match (&e.message, &e.field) {
            (Some(message), _) if !message.is_empty() => message.clone(),
            (_, Some(field)) => format!("{field}: {}", e.code),
            _ => e.code.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
