//! Facet keys, backend attribute slugs and the trust fan-out table.
//!
//! These tables are the wire contract between the storefront's facet rail and
//! the commerce backend's attribute schema. Bump
//! [`ATTRIBUTE_SCHEMA_VERSION`] whenever a slug changes on either side.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version of the backend attribute schema these tables target.
pub const ATTRIBUTE_SCHEMA_VERSION: &str = "v1";

/// Backend attribute slugs.
pub mod slugs {
    pub const CATEGORY: &str = "gsv_category";
    pub const ROLES: &str = "gsv_roles";
    pub const VALUE_STREAM: &str = "gsv_value_stream";
    pub const CAPABILITIES: &str = "gsv_capabilities";
    pub const INTEGRATIONS_REQUIRED: &str = "gsv_integrations_required";
    pub const DEPLOYMENT: &str = "gsv_deployment";
    pub const VERIFIED: &str = "gsv_verified";
    pub const TRIAL_AVAILABLE: &str = "gsv_trial_available";
    pub const BADGES: &str = "gsv_badges";
    pub const LANGUAGES: &str = "gsv_languages";
    /// Variant-level attribute listing the features of a plan.
    pub const PLAN_FEATURES: &str = "plan_features";
}

/// Query key of the trust facet. It has no single backend attribute; see
/// [`TRUST_FAN_OUT`].
pub const TRUST_KEY: &str = "trust";

/// A facet that maps 1:1 onto a backend attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Category,
    Roles,
    ValueStreams,
    Capabilities,
    Integrations,
    Deployment,
}

/// One row of the facet table.
#[derive(Debug, Clone, Copy)]
pub struct FacetAttribute {
    pub facet: Facet,
    /// Query-string key used by the facet rail.
    pub key: &'static str,
    /// Backend attribute slug.
    pub slug: &'static str,
}

/// Facet → attribute table, in compile order.
pub const FACET_ATTRIBUTES: [FacetAttribute; 6] = [
    FacetAttribute {
        facet: Facet::Category,
        key: "category",
        slug: slugs::CATEGORY,
    },
    FacetAttribute {
        facet: Facet::Roles,
        key: "roles",
        slug: slugs::ROLES,
    },
    FacetAttribute {
        facet: Facet::ValueStreams,
        key: "value_streams",
        slug: slugs::VALUE_STREAM,
    },
    FacetAttribute {
        facet: Facet::Capabilities,
        key: "capabilities",
        slug: slugs::CAPABILITIES,
    },
    FacetAttribute {
        facet: Facet::Integrations,
        key: "integrations",
        slug: slugs::INTEGRATIONS_REQUIRED,
    },
    FacetAttribute {
        facet: Facet::Deployment,
        key: "deployment",
        slug: slugs::DEPLOYMENT,
    },
];

impl Facet {
    const fn row(self) -> FacetAttribute {
        let [category, roles, value_streams, capabilities, integrations, deployment] =
            FACET_ATTRIBUTES;
        match self {
            Self::Category => category,
            Self::Roles => roles,
            Self::ValueStreams => value_streams,
            Self::Capabilities => capabilities,
            Self::Integrations => integrations,
            Self::Deployment => deployment,
        }
    }

    /// Query-string key for this facet.
    #[must_use]
    pub const fn key(self) -> &'static str {
        self.row().key
    }

    /// Backend attribute slug for this facet.
    #[must_use]
    pub const fn attribute_slug(self) -> &'static str {
        self.row().slug
    }

    /// Look up a facet by its query-string key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        FACET_ATTRIBUTES
            .iter()
            .find(|row| row.key == key)
            .map(|row| row.facet)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One trust signal and the attribute clauses it expands to.
#[derive(Debug, Clone, Copy)]
pub struct TrustSignal {
    /// Value of the `trust` facet (e.g. `verified`).
    pub value: &'static str,
    /// `(slug, value)` pairs added to the filter when the signal is selected.
    pub clauses: &'static [(&'static str, &'static str)],
}

/// Trust facet fan-out, in compile order.
pub const TRUST_FAN_OUT: [TrustSignal; 3] = [
    TrustSignal {
        value: "verified",
        clauses: &[(slugs::VERIFIED, "true")],
    },
    TrustSignal {
        value: "trial",
        clauses: &[(slugs::TRIAL_AVAILABLE, "true")],
    },
    TrustSignal {
        value: "featured",
        clauses: &[(slugs::BADGES, "featured")],
    },
];

/// Facet selections taken from the query string.
///
/// Values keep insertion order within a facet and are deduplicated. Keys are
/// stored as given; the compiler only reads the keys it knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState {
    facets: BTreeMap<String, Vec<String>>,
}

impl FilterState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw query pairs.
    ///
    /// Repeated keys accumulate (`?roles=sales&roles=hr`) and a single value
    /// may carry a comma-separated list (`?roles=sales,hr`).
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut state = Self::new();
        for (key, value) in pairs {
            for part in value.as_ref().split(',') {
                state.insert(key.as_ref(), part);
            }
        }
        state
    }

    /// Add a value to a facet. Returns `false` when the value is blank or
    /// already selected.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }
        let values = self.facets.entry(key.to_string()).or_default();
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_string());
        true
    }

    /// Selected values for `key`, empty when the facet is not active.
    #[must_use]
    pub fn values(&self, key: &str) -> &[String] {
        self.facets.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Selected values for a mapped facet.
    #[must_use]
    pub fn facet_values(&self, facet: Facet) -> &[String] {
        self.values(facet.key())
    }

    /// Whether `value` is selected under `key`.
    #[must_use]
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.values().all(Vec::is_empty)
    }
}

/// A facet value fixed by the page rather than chosen by the visitor (e.g.
/// the role of a solutions landing page).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinnedFacet {
    pub facet: Facet,
    pub value: String,
}

impl PinnedFacet {
    #[must_use]
    pub fn new(facet: Facet, value: impl Into<String>) -> Self {
        Self {
            facet,
            value: value.into(),
        }
    }
}

/// Error parsing a `facet=value` pin.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinParseError {
    #[error("expected facet=value, got {0:?}")]
    MissingSeparator(String),
    #[error("unknown facet {0:?}")]
    UnknownFacet(String),
    #[error("pinned value for {0} is empty")]
    EmptyValue(Facet),
}

impl FromStr for PinnedFacet {
    type Err = PinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| PinParseError::MissingSeparator(s.to_string()))?;
        let facet = Facet::from_key(key.trim())
            .ok_or_else(|| PinParseError::UnknownFacet(key.trim().to_string()))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(PinParseError::EmptyValue(facet));
        }
        Ok(Self::new(facet, value))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_facet_table_round_trips_keys() {
        for row in FACET_ATTRIBUTES {
            assert_eq!(Facet::from_key(row.key), Some(row.facet));
            assert_eq!(row.facet.attribute_slug(), row.slug);
        }
        assert_eq!(Facet::from_key("trust"), None);
        assert_eq!(Facet::from_key("colour"), None);
    }

    #[test]
    fn test_filter_state_dedups_and_keeps_order() {
        let state = FilterState::from_pairs([
            ("roles", "sales"),
            ("roles", "hr,sales"),
            ("roles", " "),
            ("roles", "finance"),
        ]);
        assert_eq!(state.values("roles"), ["sales", "hr", "finance"]);
    }

    #[test]
    fn test_filter_state_empty_when_only_blank_values() {
        let state = FilterState::from_pairs([("roles", ""), ("trust", ",")]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_pin_parse() {
        let pin: PinnedFacet = "roles=sales_sdr".parse().unwrap();
        assert_eq!(pin, PinnedFacet::new(Facet::Roles, "sales_sdr"));

        assert_eq!(
            "roles".parse::<PinnedFacet>(),
            Err(PinParseError::MissingSeparator("roles".to_string()))
        );
        assert_eq!(
            "trust=verified".parse::<PinnedFacet>(),
            Err(PinParseError::UnknownFacet("trust".to_string()))
        );
        assert_eq!(
            "deployment= ".parse::<PinnedFacet>(),
            Err(PinParseError::EmptyValue(Facet::Deployment))
        );
    }
}
