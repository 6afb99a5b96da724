//! Facet selections → backend attribute filter.
//!
//! The backend ANDs clauses across slugs and ORs values within one slug, so
//! every slug must appear at most once: a second clause for the same slug
//! would narrow the result instead of widening it.

use serde::{Deserialize, Serialize};

use super::facets::{FACET_ATTRIBUTES, FilterState, PinnedFacet, TRUST_FAN_OUT, TRUST_KEY};

/// One `{slug, values}` clause of an attribute filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeClause {
    pub slug: String,
    pub values: Vec<String>,
}

/// Ordered attribute clauses with at most one clause per slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeFilter {
    clauses: Vec<AttributeClause>,
}

impl AttributeFilter {
    #[must_use]
    pub fn clauses(&self) -> &[AttributeClause] {
        &self.clauses
    }

    /// The clause for `slug`, if any.
    #[must_use]
    pub fn clause(&self, slug: &str) -> Option<&AttributeClause> {
        self.clauses.iter().find(|c| c.slug == slug)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Union `values` into the clause for `slug`, creating it at the end when
    /// absent. Values already present are skipped; an empty `values` never
    /// creates a clause.
    pub fn merge<'a, I>(&mut self, slug: &str, values: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut values = values.into_iter().peekable();
        let index = match self.clauses.iter().position(|c| c.slug == slug) {
            Some(index) => index,
            None => {
                if values.peek().is_none() {
                    return;
                }
                self.clauses.push(AttributeClause {
                    slug: slug.to_string(),
                    values: Vec::new(),
                });
                self.clauses.len() - 1
            }
        };
        let Some(clause) = self.clauses.get_mut(index) else {
            return;
        };
        for value in values {
            if !clause.values.iter().any(|v| v == value) {
                clause.values.push(value.to_string());
            }
        }
    }
}

/// Compile facet selections into a backend attribute filter.
///
/// Clause order is fixed: the pinned facet first, then mapped facets in
/// [`FACET_ATTRIBUTES`] order, then trust signals in [`TRUST_FAN_OUT`] order.
/// Keys that are not in either table are dropped.
///
/// Returns `None` when nothing is selected and nothing is pinned; the caller
/// must then omit the filter argument instead of sending an empty one.
#[must_use]
pub fn compile(state: &FilterState, pinned: Option<&PinnedFacet>) -> Option<AttributeFilter> {
    let mut filter = AttributeFilter::default();

    if let Some(pin) = pinned {
        let value = pin.value.trim();
        if !value.is_empty() {
            filter.merge(pin.facet.attribute_slug(), [value]);
        }
    }

    for row in &FACET_ATTRIBUTES {
        filter.merge(row.slug, state.values(row.key).iter().map(String::as_str));
    }

    for signal in &TRUST_FAN_OUT {
        if state.contains(TRUST_KEY, signal.value) {
            for (slug, value) in signal.clauses {
                filter.merge(slug, [*value]);
            }
        }
    }

    (!filter.is_empty()).then_some(filter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::facets::{Facet, slugs};

    fn clause(slug: &str, values: &[&str]) -> AttributeClause {
        AttributeClause {
            slug: slug.to_string(),
            values: values.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn test_empty_state_compiles_to_none() {
        assert_eq!(compile(&FilterState::new(), None), None);
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let state = FilterState::from_pairs([("colour", "red"), ("sort", "price")]);
        assert_eq!(compile(&state, None), None);
    }

    #[test]
    fn test_unknown_trust_values_are_dropped() {
        let state = FilterState::from_pairs([("trust", "audited")]);
        assert_eq!(compile(&state, None), None);
    }

    #[test]
    fn test_roles_and_trust_fan_out_to_three_clauses() {
        let state = FilterState::from_pairs([
            ("roles", "sales"),
            ("trust", "verified"),
            ("trust", "trial"),
        ]);

        let filter = compile(&state, None).unwrap();

        assert_eq!(
            filter.clauses(),
            [
                clause(slugs::ROLES, &["sales"]),
                clause(slugs::VERIFIED, &["true"]),
                clause(slugs::TRIAL_AVAILABLE, &["true"]),
            ]
        );
    }

    #[test]
    fn test_featured_trust_maps_to_badges() {
        let state = FilterState::from_pairs([("trust", "featured")]);
        let filter = compile(&state, None).unwrap();
        assert_eq!(filter.clauses(), [clause(slugs::BADGES, &["featured"])]);
    }

    #[test]
    fn test_pinned_slug_is_unioned_with_user_facet() {
        let state = FilterState::from_pairs([
            ("roles", "marketing"),
            ("roles", "sales_sdr"),
            ("deployment", "shared"),
        ]);
        let pin = PinnedFacet::new(Facet::Roles, "sales_sdr");

        let filter = compile(&state, Some(&pin)).unwrap();

        assert_eq!(
            filter.clauses(),
            [
                clause(slugs::ROLES, &["sales_sdr", "marketing"]),
                clause(slugs::DEPLOYMENT, &["shared"]),
            ]
        );
    }

    #[test]
    fn test_pinned_alone_produces_filter() {
        let pin = PinnedFacet::new(Facet::Category, "agent");
        let filter = compile(&FilterState::new(), Some(&pin)).unwrap();
        assert_eq!(filter.clauses(), [clause(slugs::CATEGORY, &["agent"])]);
    }

    #[test]
    fn test_blank_pin_is_ignored() {
        let pin = PinnedFacet::new(Facet::Category, "  ");
        assert_eq!(compile(&FilterState::new(), Some(&pin)), None);
    }

    #[test]
    fn test_clause_order_follows_table_not_input() {
        let forward = FilterState::from_pairs([
            ("deployment", "vcluster"),
            ("trust", "trial"),
            ("category", "agent"),
            ("trust", "verified"),
            ("capabilities", "rag.knowledge_base"),
        ]);
        let reversed = FilterState::from_pairs([
            ("capabilities", "rag.knowledge_base"),
            ("trust", "verified"),
            ("category", "agent"),
            ("trust", "trial"),
            ("deployment", "vcluster"),
        ]);

        let a = compile(&forward, None).unwrap();
        let b = compile(&reversed, None).unwrap();

        assert_eq!(a, b);
        let slugs: Vec<&str> = a.clauses().iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(
            slugs,
            [
                slugs::CATEGORY,
                slugs::CAPABILITIES,
                slugs::DEPLOYMENT,
                slugs::VERIFIED,
                slugs::TRIAL_AVAILABLE,
            ]
        );
    }

    #[test]
    fn test_compile_is_deterministic_on_the_wire() {
        let state = FilterState::from_pairs([
            ("integrations", "slack,jira"),
            ("value_streams", "customer_support"),
            ("trust", "featured"),
        ]);
        let first = serde_json::to_string(&compile(&state, None)).unwrap();
        let second = serde_json::to_string(&compile(&state, None)).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            r#"[{"slug":"gsv_value_stream","values":["customer_support"]},{"slug":"gsv_integrations_required","values":["slack","jira"]},{"slug":"gsv_badges","values":["featured"]}]"#
        );
    }

    #[test]
    fn test_merge_never_duplicates_slug_or_value() {
        let mut filter = AttributeFilter::default();
        filter.merge("gsv_roles", ["hr"]);
        filter.merge("gsv_roles", ["hr", "finance"]);
        filter.merge("gsv_roles", Vec::<&str>::new());
        filter.merge("gsv_deployment", Vec::<&str>::new());

        assert_eq!(filter.len(), 1);
        assert_eq!(
            filter.clause("gsv_roles").map(|c| c.values.clone()),
            Some(vec!["hr".to_string(), "finance".to_string()])
        );
    }
}
