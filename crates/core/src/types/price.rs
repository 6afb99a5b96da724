//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// The commerce backend reports amounts as JSON floats; they are converted to
/// `Decimal` at the boundary so plan ordering and credit grants never depend
/// on float rounding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code as reported by the channel.
    pub currency_code: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Convert a backend float amount.
    ///
    /// Non-finite amounts collapse to zero rather than failing; catalog data
    /// is untrusted and the projection must always produce a value.
    #[must_use]
    pub fn from_backend(amount: f64, currency_code: impl Into<String>) -> Self {
        Self::new(decimal_from_backend(amount), currency_code)
    }

    /// Whether this price is zero (a free plan).
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.amount.is_zero()
    }
}

/// Convert a backend float amount into a `Decimal`, normalizing to at most
/// four fractional digits.
#[must_use]
pub fn decimal_from_backend(amount: f64) -> Decimal {
    Decimal::try_from(amount)
        .map(|d| d.round_dp(4).normalize())
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_backend_keeps_cents() {
        let price = Price::from_backend(19.99, "USD");
        assert_eq!(price.amount, Decimal::new(1999, 2));
        assert_eq!(price.currency_code, "USD");
    }

    #[test]
    fn test_from_backend_non_finite_is_zero() {
        assert!(Price::from_backend(f64::NAN, "USD").is_free());
        assert!(Price::from_backend(f64::INFINITY, "USD").is_free());
    }
}
