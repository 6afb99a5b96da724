//! Core types for the Agent Marketplace.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod checkout;
pub mod id;
pub mod price;

pub use checkout::{Checkout, CheckoutLine, CheckoutSession};
pub use id::*;
pub use price::Price;
