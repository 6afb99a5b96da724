//! Canonical display model for catalog products.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId, VariantId};

/// The kind of offering. Every product resolves to exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Agent,
    App,
    Assistant,
    Automation,
}

impl Category {
    /// Parse a category word. Singular and plural forms are accepted, case
    /// is ignored.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim().to_ascii_lowercase().as_str() {
            "agent" | "agents" => Some(Self::Agent),
            "app" | "apps" => Some(Self::App),
            "assistant" | "assistants" => Some(Self::Assistant),
            "automation" | "automations" => Some(Self::Automation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::App => "app",
            Self::Assistant => "assistant",
            Self::Automation => "automation",
        }
    }

    /// Collection slug that marks membership in this category.
    #[must_use]
    pub const fn collection_slug(self) -> &'static str {
        match self {
            Self::Agent => "agents",
            Self::App => "apps",
            Self::Assistant => "assistants",
            Self::Automation => "automations",
        }
    }

    /// Default `[min, max]` credits estimate per run.
    #[must_use]
    pub const fn default_credits_estimate(self) -> (u32, u32) {
        match self {
            Self::Agent => (5, 25),
            Self::App => (3, 15),
            Self::Assistant => (2, 10),
            Self::Automation => (1, 5),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A product as shown on listing cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub outcome_tagline: Option<String>,
    pub thumbnail: Option<String>,
    pub category: Category,
    pub capabilities: Vec<String>,
    pub starting_price: Option<Price>,
    pub credits_estimate_min: u32,
    pub credits_estimate_max: u32,
    pub verified: bool,
    pub trial_available: bool,
    pub is_new: bool,
}

/// A product as shown on its detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingDetail {
    #[serde(flatten)]
    pub offering: Offering,
    pub long_description: Option<String>,
    pub integrations: Vec<String>,
    pub value_streams: Vec<String>,
    pub deployment_modes: Vec<String>,
    pub languages: Vec<String>,
    /// Sorted ascending by price; never empty.
    pub plans: Vec<Plan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingPeriod {
    #[serde(rename = "14 days")]
    TrialFourteenDays,
    #[serde(rename = "monthly")]
    Monthly,
}

impl BillingPeriod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrialFourteenDays => "14 days",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchasable plan, built from one product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: VariantId,
    pub name: String,
    pub sku: Option<String>,
    pub price: Price,
    pub billing_period: BillingPeriod,
    pub credits_grant: u32,
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_words() {
        assert_eq!(Category::from_word("Agents"), Some(Category::Agent));
        assert_eq!(Category::from_word("APP"), Some(Category::App));
        assert_eq!(Category::from_word(" assistants "), Some(Category::Assistant));
        assert_eq!(Category::from_word("automation"), Some(Category::Automation));
        assert_eq!(Category::from_word("widgets"), None);
        assert_eq!(Category::from_word(""), None);
    }

    #[test]
    fn test_collection_slug_parses_back() {
        for category in [
            Category::Agent,
            Category::App,
            Category::Assistant,
            Category::Automation,
        ] {
            assert_eq!(Category::from_word(category.collection_slug()), Some(category));
        }
    }

    #[test]
    fn test_billing_period_wire_names() {
        assert_eq!(
            serde_json::to_string(&BillingPeriod::TrialFourteenDays).ok(),
            Some("\"14 days\"".to_string())
        );
        assert_eq!(BillingPeriod::Monthly.to_string(), "monthly");
    }
}
