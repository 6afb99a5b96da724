//! Product records as the commerce backend returns them.
//!
//! Every field is optional on the wire and an explicit `null` is treated the
//! same as an absent field, so a record never fails to deserialize because a
//! merchant left something blank.

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ProductId;

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A product with its attributes, metadata, variants and collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProduct {
    #[serde(deserialize_with = "nullable")]
    pub id: ProductId,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    pub description: Option<String>,
    pub seo_description: Option<String>,
    pub thumbnail: Option<RawImage>,
    pub pricing: Option<RawProductPricing>,
    pub category: Option<RawCategory>,
    #[serde(deserialize_with = "nullable")]
    pub attributes: Vec<RawAttribute>,
    #[serde(deserialize_with = "nullable")]
    pub metadata: Vec<MetadataEntry>,
    #[serde(deserialize_with = "nullable")]
    pub variants: Vec<RawVariant>,
    #[serde(deserialize_with = "nullable")]
    pub collections: Vec<RawCollection>,
}

impl RawProduct {
    /// Values of the attribute `slug`; empty when the product does not carry
    /// it.
    #[must_use]
    pub fn find_attribute(&self, slug: &str) -> &[AttributeValue] {
        find_attribute(&self.attributes, slug)
    }

    /// Value of the metadata entry `key`.
    #[must_use]
    pub fn find_metadata(&self, key: &str) -> Option<&str> {
        find_metadata(&self.metadata, key)
    }

    /// Lowest price across the product's variants.
    #[must_use]
    pub fn starting_price(&self) -> Option<&RawMoney> {
        self.pricing
            .as_ref()?
            .price_range
            .as_ref()?
            .start
            .as_ref()?
            .gross
            .as_ref()
    }

    #[must_use]
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail
            .as_ref()
            .map(|image| image.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// A purchasable variant of a product. Each variant becomes one plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawVariant {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub sku: Option<String>,
    pub pricing: Option<RawVariantPricing>,
    #[serde(deserialize_with = "nullable")]
    pub attributes: Vec<RawAttribute>,
    #[serde(deserialize_with = "nullable")]
    pub metadata: Vec<MetadataEntry>,
}

impl RawVariant {
    #[must_use]
    pub fn find_attribute(&self, slug: &str) -> &[AttributeValue] {
        find_attribute(&self.attributes, slug)
    }

    #[must_use]
    pub fn find_metadata(&self, key: &str) -> Option<&str> {
        find_metadata(&self.metadata, key)
    }

    /// Gross price of the variant in the requested channel.
    #[must_use]
    pub fn price(&self) -> Option<&RawMoney> {
        self.pricing.as_ref()?.price.as_ref()?.gross.as_ref()
    }
}

/// An attribute assignment: the attribute and the values chosen for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAttribute {
    #[serde(deserialize_with = "nullable")]
    pub attribute: AttributeRef,
    #[serde(deserialize_with = "nullable")]
    pub values: Vec<AttributeValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeRef {
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

/// One value of an attribute. `slug` is stable, `name` is for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeValue {
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

impl AttributeValue {
    /// Display name, falling back to the slug when the name is blank.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.slug
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataEntry {
    #[serde(deserialize_with = "nullable")]
    pub key: String,
    #[serde(deserialize_with = "nullable")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCollection {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCategory {
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawImage {
    #[serde(deserialize_with = "nullable")]
    pub url: String,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProductPricing {
    pub price_range: Option<RawPriceRange>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPriceRange {
    pub start: Option<RawTaxedMoney>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVariantPricing {
    pub price: Option<RawTaxedMoney>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTaxedMoney {
    pub gross: Option<RawMoney>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMoney {
    #[serde(deserialize_with = "nullable")]
    pub amount: f64,
    #[serde(deserialize_with = "nullable")]
    pub currency: String,
}

/// Values of the attribute `slug` in `attributes`, empty when absent.
#[must_use]
pub fn find_attribute<'a>(attributes: &'a [RawAttribute], slug: &str) -> &'a [AttributeValue] {
    attributes
        .iter()
        .find(|a| a.attribute.slug == slug)
        .map(|a| a.values.as_slice())
        .unwrap_or_default()
}

/// Value of the metadata entry `key`, if present.
#[must_use]
pub fn find_metadata<'a>(metadata: &'a [MetadataEntry], key: &str) -> Option<&'a str> {
    metadata
        .iter()
        .find(|m| m.key == key)
        .map(|m| m.value.as_str())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_nulls_deserialize_as_absent() {
        let product: RawProduct = serde_json::from_value(json!({
            "id": "UHJvZHVjdDox",
            "name": null,
            "slug": "support-bot",
            "attributes": null,
            "metadata": null,
            "variants": null,
            "collections": null,
            "pricing": { "priceRange": null },
            "thumbnail": null
        }))
        .unwrap();

        assert_eq!(product.id.as_str(), "UHJvZHVjdDox");
        assert!(product.name.is_empty());
        assert!(product.attributes.is_empty());
        assert!(product.variants.is_empty());
        assert!(product.starting_price().is_none());
        assert!(product.thumbnail_url().is_none());
    }

    #[test]
    fn test_empty_object_is_a_product() {
        let product: RawProduct = serde_json::from_value(json!({})).unwrap();
        assert_eq!(product, RawProduct::default());
    }

    #[test]
    fn test_lookups() {
        let product: RawProduct = serde_json::from_value(json!({
            "attributes": [
                {
                    "attribute": { "slug": "gsv_roles", "name": "Roles" },
                    "values": [
                        { "slug": "sales_sdr", "name": "Sales / SDR" },
                        { "slug": "hr", "name": null }
                    ]
                }
            ],
            "metadata": [{ "key": "outcome_tagline", "value": "Close more deals" }],
            "pricing": {
                "priceRange": { "start": { "gross": { "amount": 49.0, "currency": "USD" } } }
            }
        }))
        .unwrap();

        let roles: Vec<&str> = product
            .find_attribute("gsv_roles")
            .iter()
            .map(AttributeValue::display_name)
            .collect();
        assert_eq!(roles, ["Sales / SDR", "hr"]);
        assert!(product.find_attribute("gsv_badges").is_empty());

        assert_eq!(product.find_metadata("outcome_tagline"), Some("Close more deals"));
        assert_eq!(product.find_metadata("credits_grant"), None);

        assert_eq!(product.starting_price().unwrap().currency, "USD");
    }

    #[test]
    fn test_variant_price_path() {
        let variant: RawVariant = serde_json::from_value(json!({
            "id": "UHJvZHVjdFZhcmlhbnQ6MQ==",
            "name": "Pro",
            "pricing": { "price": { "gross": { "amount": 29.99, "currency": "EUR" } } }
        }))
        .unwrap();

        let price = variant.price().unwrap();
        assert!((price.amount - 29.99).abs() < f64::EPSILON);
        assert_eq!(price.currency, "EUR");
    }
}
