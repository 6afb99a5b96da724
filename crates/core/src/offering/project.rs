//! Raw product → display model.
//!
//! Catalog data is edited by hand on the backend and is routinely incomplete,
//! so projection never fails: every field has its own fallback and a missing
//! value degrades to it.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::model::{BillingPeriod, Category, Offering, OfferingDetail, Plan};
use super::raw::{AttributeValue, RawProduct, RawVariant};
use crate::catalog::slugs;
use crate::types::{Price, VariantId, price::decimal_from_backend};

/// Product metadata keys.
pub mod metadata_keys {
    pub const CREDITS_ESTIMATE_MIN: &str = "credits_estimate_min";
    pub const CREDITS_ESTIMATE_MAX: &str = "credits_estimate_max";
    pub const OUTCOME_TAGLINE: &str = "outcome_tagline";
    /// Variant-level: credits granted when the plan is purchased.
    pub const CREDITS_GRANT: &str = "credits_grant";
}

/// Currency used when neither the variant nor the product reports one.
pub const FALLBACK_CURRENCY: &str = "USD";

/// Languages assumed when the product lists none.
pub const DEFAULT_LANGUAGES: [&str; 1] = ["en"];

/// Id of the plan substituted for products without variants.
pub const FREE_TRIAL_PLAN_ID: &str = "default-trial";

const FREE_TRIAL_CREDITS: u32 = 100;
const CREDITS_PER_CURRENCY_UNIT: u32 = 100;

/// Project a product for listing cards.
#[must_use]
pub fn project(product: &RawProduct) -> Offering {
    let category = resolve_category(product);
    let (default_min, default_max) = category.default_credits_estimate();
    let outcome_tagline = product
        .find_metadata(metadata_keys::OUTCOME_TAGLINE)
        .and_then(non_blank);

    Offering {
        id: product.id.clone(),
        slug: product.slug.clone(),
        name: product.name.clone(),
        description: outcome_tagline
            .clone()
            .or_else(|| product.description.as_deref().and_then(non_blank)),
        outcome_tagline,
        thumbnail: product.thumbnail_url().map(str::to_string),
        category,
        capabilities: value_slugs(product.find_attribute(slugs::CAPABILITIES)),
        starting_price: product
            .starting_price()
            .map(|money| Price::from_backend(money.amount, currency_or_fallback(&money.currency))),
        credits_estimate_min: credits_metadata(product, metadata_keys::CREDITS_ESTIMATE_MIN)
            .unwrap_or(default_min),
        credits_estimate_max: credits_metadata(product, metadata_keys::CREDITS_ESTIMATE_MAX)
            .unwrap_or(default_max),
        verified: flag_or_true(product.find_attribute(slugs::VERIFIED)),
        trial_available: flag_or_true(product.find_attribute(slugs::TRIAL_AVAILABLE)),
        is_new: product
            .find_attribute(slugs::BADGES)
            .iter()
            .any(|badge| badge.slug.eq_ignore_ascii_case("new")),
    }
}

/// Project a product for its detail page, including plans.
#[must_use]
pub fn project_detail(product: &RawProduct) -> OfferingDetail {
    let offering = project(product);
    let currency = offering
        .starting_price
        .as_ref()
        .map_or(FALLBACK_CURRENCY, |price| price.currency_code.as_str())
        .to_string();

    let mut languages = value_names(product.find_attribute(slugs::LANGUAGES));
    if languages.is_empty() {
        languages = DEFAULT_LANGUAGES.iter().map(ToString::to_string).collect();
    }

    OfferingDetail {
        long_description: product.description.as_deref().and_then(non_blank),
        integrations: value_names(product.find_attribute(slugs::INTEGRATIONS_REQUIRED)),
        value_streams: value_names(product.find_attribute(slugs::VALUE_STREAM)),
        deployment_modes: value_names(product.find_attribute(slugs::DEPLOYMENT)),
        languages,
        plans: project_plans(&product.variants, &currency),
        offering,
    }
}

/// Resolve the category: explicit attribute, then a recognized collection,
/// then the raw category, then the default.
///
/// An explicit value that is not a known category word still wins and maps
/// to the default; it does not fall through to the collections.
#[must_use]
pub fn resolve_category(product: &RawProduct) -> Category {
    if let Some(value) = product
        .find_attribute(slugs::CATEGORY)
        .iter()
        .find(|value| !value.slug.trim().is_empty())
    {
        return Category::from_word(&value.slug).unwrap_or_default();
    }

    if let Some(category) = product.collections.iter().find_map(|collection| {
        let slug = collection.slug.to_ascii_lowercase();
        [
            Category::Agent,
            Category::App,
            Category::Assistant,
            Category::Automation,
        ]
        .into_iter()
        .find(|category| category.collection_slug() == slug)
    }) {
        return category;
    }

    product
        .category
        .as_ref()
        .and_then(|raw| Category::from_word(&raw.slug))
        .unwrap_or_default()
}

/// Credits granted by a plan whose variant carries no explicit grant: a flat
/// grant for free plans, otherwise proportional to price.
///
/// TODO: confirm the per-currency-unit multiplier with pricing before paid
/// plans launch outside USD.
#[must_use]
pub fn default_credit_grant(price: Decimal) -> u32 {
    if price.is_zero() {
        return FREE_TRIAL_CREDITS;
    }
    // Saturates on overflow.
    let Some(credits) = price.checked_mul(Decimal::from(CREDITS_PER_CURRENCY_UNIT)) else {
        return u32::MAX;
    };
    if credits.is_sign_negative() {
        return 0;
    }
    credits.round().to_u32().unwrap_or(u32::MAX)
}

fn project_plans(variants: &[RawVariant], currency: &str) -> Vec<Plan> {
    if variants.is_empty() {
        return vec![free_trial_plan(currency)];
    }

    let mut plans: Vec<Plan> = variants
        .iter()
        .map(|variant| project_plan(variant, currency))
        .collect();
    // `sort_by` is stable: equal prices keep variant order.
    plans.sort_by(|a, b| a.price.amount.cmp(&b.price.amount));
    plans
}

fn project_plan(variant: &RawVariant, currency: &str) -> Plan {
    let price = variant.price().map_or_else(
        || Price::new(Decimal::ZERO, currency),
        |money| {
            let code = if money.currency.is_empty() {
                currency
            } else {
                money.currency.as_str()
            };
            Price::new(decimal_from_backend(money.amount), code)
        },
    );

    let credits_grant = variant
        .find_metadata(metadata_keys::CREDITS_GRANT)
        .and_then(parse_credits)
        .filter(|grant| *grant > 0)
        .unwrap_or_else(|| default_credit_grant(price.amount));

    Plan {
        id: VariantId::new(variant.id.clone()),
        name: variant.name.clone(),
        sku: variant.sku.as_deref().and_then(non_blank),
        billing_period: if price.is_free() {
            BillingPeriod::TrialFourteenDays
        } else {
            BillingPeriod::Monthly
        },
        credits_grant,
        features: value_names(variant.find_attribute(slugs::PLAN_FEATURES)),
        price,
    }
}

fn free_trial_plan(currency: &str) -> Plan {
    Plan {
        id: VariantId::new(FREE_TRIAL_PLAN_ID),
        name: "Free Trial".to_string(),
        sku: None,
        price: Price::new(Decimal::ZERO, currency),
        billing_period: BillingPeriod::TrialFourteenDays,
        credits_grant: FREE_TRIAL_CREDITS,
        features: vec![
            format!("{FREE_TRIAL_CREDITS} credits included"),
            "Basic features".to_string(),
        ],
    }
}

fn credits_metadata(product: &RawProduct, key: &str) -> Option<u32> {
    product.find_metadata(key).and_then(parse_credits)
}

fn parse_credits(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Present → the value is `true`; absent → `true`.
fn flag_or_true(values: &[AttributeValue]) -> bool {
    values.first().is_none_or(|value| {
        value.slug.eq_ignore_ascii_case("true") || value.name.eq_ignore_ascii_case("true")
    })
}

fn value_slugs(values: &[AttributeValue]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.slug.clone())
        .filter(|slug| !slug.is_empty())
        .collect()
}

fn value_names(values: &[AttributeValue]) -> Vec<String> {
    values
        .iter()
        .map(AttributeValue::display_name)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn currency_or_fallback(code: &str) -> &str {
    if code.is_empty() {
        FALLBACK_CURRENCY
    } else {
        code
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn product(value: Value) -> RawProduct {
        serde_json::from_value(value).unwrap()
    }

    fn attribute(slug: &str, values: &[&str]) -> Value {
        json!({
            "attribute": { "slug": slug, "name": slug },
            "values": values
                .iter()
                .map(|v| json!({ "slug": v, "name": v }))
                .collect::<Vec<_>>()
        })
    }

    fn variant(id: &str, amount: Option<f64>) -> Value {
        json!({
            "id": id,
            "name": id,
            "pricing": amount.map(|a| json!({ "price": { "gross": { "amount": a, "currency": "USD" } } }))
        })
    }

    #[test]
    fn test_bare_product_projects_to_defaults() {
        let offering = project(&product(json!({ "id": "p1", "name": "Bot", "slug": "bot" })));

        assert_eq!(offering.category, Category::Agent);
        assert_eq!(
            (offering.credits_estimate_min, offering.credits_estimate_max),
            (5, 25)
        );
        assert!(offering.verified);
        assert!(offering.trial_available);
        assert!(!offering.is_new);
        assert!(offering.capabilities.is_empty());
        assert_eq!(offering.description, None);
        assert_eq!(offering.starting_price, None);
    }

    #[test]
    fn test_category_priority() {
        let attribute_wins = product(json!({
            "attributes": [attribute(slugs::CATEGORY, &["automation"])],
            "collections": [{ "id": "c1", "name": "Apps", "slug": "apps" }],
            "category": { "slug": "assistants", "name": "Assistants" }
        }));
        assert_eq!(resolve_category(&attribute_wins), Category::Automation);

        let collection_wins = product(json!({
            "collections": [
                { "id": "c0", "name": "Featured", "slug": "featured" },
                { "id": "c1", "name": "Apps", "slug": "APPS" }
            ],
            "category": { "slug": "assistants", "name": "Assistants" }
        }));
        assert_eq!(resolve_category(&collection_wins), Category::App);

        let raw_category = product(json!({
            "category": { "slug": "Assistants", "name": "Assistants" }
        }));
        assert_eq!(resolve_category(&raw_category), Category::Assistant);

        let unknown_attribute = product(json!({
            "attributes": [attribute(slugs::CATEGORY, &["robot"])],
            "collections": [{ "id": "c1", "name": "Apps", "slug": "apps" }]
        }));
        assert_eq!(resolve_category(&unknown_attribute), Category::Agent);
    }

    #[test]
    fn test_credits_fall_back_per_field() {
        let offering = project(&product(json!({
            "attributes": [attribute(slugs::CATEGORY, &["app"])],
            "metadata": [{ "key": "credits_estimate_min", "value": "20" }]
        })));
        assert_eq!(offering.credits_estimate_min, 20);
        assert_eq!(offering.credits_estimate_max, 15);

        let offering = project(&product(json!({
            "metadata": [
                { "key": "credits_estimate_min", "value": "lots" },
                { "key": "credits_estimate_max", "value": " 40 " }
            ]
        })));
        assert_eq!(offering.credits_estimate_min, 5);
        assert_eq!(offering.credits_estimate_max, 40);
    }

    #[test]
    fn test_trust_flags_follow_attribute_when_present() {
        let offering = project(&product(json!({
            "attributes": [
                attribute(slugs::VERIFIED, &["false"]),
                attribute(slugs::TRIAL_AVAILABLE, &["TRUE"]),
                attribute(slugs::BADGES, &["featured", "new"])
            ]
        })));
        assert!(!offering.verified);
        assert!(offering.trial_available);
        assert!(offering.is_new);
    }

    #[test]
    fn test_tagline_overrides_description() {
        let offering = project(&product(json!({
            "description": "Long form description",
            "metadata": [{ "key": "outcome_tagline", "value": "Cut ticket volume" }]
        })));
        assert_eq!(offering.description.as_deref(), Some("Cut ticket volume"));
        assert_eq!(offering.outcome_tagline.as_deref(), Some("Cut ticket volume"));

        let offering = project(&product(json!({
            "description": "Long form description",
            "metadata": [{ "key": "outcome_tagline", "value": "  " }]
        })));
        assert_eq!(offering.description.as_deref(), Some("Long form description"));
        assert_eq!(offering.outcome_tagline, None);
    }

    #[test]
    fn test_capabilities_use_value_slugs() {
        let offering = project(&product(json!({
            "attributes": [{
                "attribute": { "slug": slugs::CAPABILITIES, "name": "Capabilities" },
                "values": [{ "slug": "rag.knowledge_base", "name": "RAG Knowledgebase" }]
            }]
        })));
        assert_eq!(offering.capabilities, ["rag.knowledge_base"]);
    }

    #[test]
    fn test_zero_variants_yield_free_trial() {
        let detail = project_detail(&product(json!({ "id": "p1", "variants": [] })));

        assert_eq!(detail.plans.len(), 1);
        let plan = detail.plans.first().unwrap();
        assert_eq!(plan.id.as_str(), FREE_TRIAL_PLAN_ID);
        assert_eq!(plan.name, "Free Trial");
        assert!(plan.price.is_free());
        assert_eq!(plan.billing_period, BillingPeriod::TrialFourteenDays);
        assert_eq!(plan.credits_grant, 100);
        assert_eq!(plan.features, ["100 credits included", "Basic features"]);
    }

    #[test]
    fn test_plans_sorted_by_price_and_stable() {
        let detail = project_detail(&product(json!({
            "variants": [
                variant("pro", Some(49.0)),
                variant("trial", None),
                variant("starter", Some(9.5)),
                variant("team", Some(49.0)),
                variant("free", Some(0.0))
            ]
        })));

        let ids: Vec<&str> = detail.plans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["trial", "free", "starter", "pro", "team"]);
        assert!(
            detail
                .plans
                .windows(2)
                .all(|pair| pair.first().map(|p| p.price.amount)
                    <= pair.get(1).map(|p| p.price.amount))
        );
    }

    #[test]
    fn test_plan_credit_grant_and_billing_period() {
        let detail = project_detail(&product(json!({
            "variants": [
                {
                    "id": "explicit",
                    "name": "Explicit",
                    "pricing": { "price": { "gross": { "amount": 20.0, "currency": "USD" } } },
                    "metadata": [{ "key": "credits_grant", "value": "5000" }],
                    "attributes": [attribute(slugs::PLAN_FEATURES, &["Priority support", "SSO"])]
                },
                {
                    "id": "zero-grant",
                    "name": "Zero",
                    "pricing": { "price": { "gross": { "amount": 12.5, "currency": "USD" } } },
                    "metadata": [{ "key": "credits_grant", "value": "0" }]
                },
                variant("free", Some(0.0))
            ]
        })));

        let by_id = |id: &str| detail.plans.iter().find(|p| p.id.as_str() == id).unwrap();

        let explicit = by_id("explicit");
        assert_eq!(explicit.credits_grant, 5000);
        assert_eq!(explicit.billing_period, BillingPeriod::Monthly);
        assert_eq!(explicit.features, ["Priority support", "SSO"]);

        assert_eq!(by_id("zero-grant").credits_grant, 1250);

        let free = by_id("free");
        assert_eq!(free.credits_grant, 100);
        assert_eq!(free.billing_period, BillingPeriod::TrialFourteenDays);
    }

    #[test]
    fn test_default_credit_grant_policy() {
        assert_eq!(default_credit_grant(Decimal::ZERO), 100);
        assert_eq!(default_credit_grant(Decimal::new(999, 2)), 999);
        assert_eq!(default_credit_grant(Decimal::new(49, 0)), 4900);
        assert_eq!(default_credit_grant(Decimal::new(50_000_000, 0)), u32::MAX);
        assert_eq!(default_credit_grant(Decimal::MAX), u32::MAX);
        assert_eq!(default_credit_grant(Decimal::new(-5, 0)), 0);
    }

    #[test]
    fn test_huge_variant_price_saturates_credit_grant() {
        let detail = project_detail(&product(json!({
            "variants": [
                {
                    "id": "enterprise",
                    "pricing": { "price": { "gross": { "amount": 7.0e28 } } }
                },
                variant("starter", Some(9.5))
            ]
        })));

        let ids: Vec<&str> = detail.plans.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["starter", "enterprise"]);
        let huge = detail.plans.last().unwrap();
        assert_eq!(huge.credits_grant, u32::MAX);
        assert_eq!(huge.billing_period, BillingPeriod::Monthly);
    }

    #[test]
    fn test_detail_lists_use_names_and_default_language() {
        let detail = project_detail(&product(json!({
            "description": "Answers questions from your docs.",
            "attributes": [
                {
                    "attribute": { "slug": slugs::INTEGRATIONS_REQUIRED, "name": "Integrations" },
                    "values": [{ "slug": "google-drive", "name": "Google Drive" }]
                },
                attribute(slugs::DEPLOYMENT, &["shared"])
            ]
        })));

        assert_eq!(detail.integrations, ["Google Drive"]);
        assert_eq!(detail.deployment_modes, ["shared"]);
        assert!(detail.value_streams.is_empty());
        assert_eq!(detail.languages, ["en"]);
        assert_eq!(
            detail.long_description.as_deref(),
            Some("Answers questions from your docs.")
        );
    }

    #[test]
    fn test_starting_price_and_plan_currency() {
        let detail = project_detail(&product(json!({
            "pricing": {
                "priceRange": { "start": { "gross": { "amount": 19.99, "currency": "EUR" } } }
            },
            "variants": [{ "id": "v1", "name": "Basic" }]
        })));

        let starting = detail.offering.starting_price.unwrap();
        assert_eq!(starting.amount, Decimal::new(1999, 2));
        assert_eq!(starting.currency_code, "EUR");

        let plan = detail.plans.first().unwrap();
        assert!(plan.price.is_free());
        assert_eq!(plan.price.currency_code, "EUR");
    }
}
