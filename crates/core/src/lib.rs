//! Agent Marketplace Core - catalog logic and shared types.
//!
//! This crate holds everything the storefront and the CLI share:
//! - [`catalog`] - Facet tables, the attribute filter compiler, landing page pins
//! - [`offering`] - Raw product shape and its projection into display models
//! - [`types`] - Newtype ids, prices, checkout value types
//!
//! # Architecture
//!
//! The core contains only types and pure functions: no HTTP clients, no
//! sessions, no database. The compiler and the projector are pure functions
//! and never fail.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod offering;
pub mod types;

pub use types::*;
