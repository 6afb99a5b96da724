//! Catalog browsing: facet tables, the attribute filter compiler and landing
//! page pins.

pub mod facets;
pub mod filter;
pub mod pages;

pub use facets::{
    ATTRIBUTE_SCHEMA_VERSION, FACET_ATTRIBUTES, Facet, FilterState, PinParseError, PinnedFacet,
    TRUST_FAN_OUT, TRUST_KEY, slugs,
};
pub use filter::{AttributeClause, AttributeFilter, compile};
pub use pages::{LandingKind, LandingPage, find_landing};
