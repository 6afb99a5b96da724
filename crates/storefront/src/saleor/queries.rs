//! GraphQL operations for the Saleor API.
//!
//! Each operation follows the layout `graphql_client` generates: a unit
//! struct implementing [`GraphQLQuery`] and a snake-case module holding the
//! document, `Variables` and `ResponseData`. Documents are written out here
//! instead of derived from a schema file.

use graphql_client::{GraphQLQuery, QueryBody};

macro_rules! operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

macro_rules! product_fields {
    () => {
        "fragment MarketplaceProductFields on Product {
  id
  name
  slug
  description
  seoDescription
  thumbnail(size: 512) { url alt }
  pricing { priceRange { start { gross { amount currency } } } }
  category { slug name }
  attributes { attribute { slug name } values { slug name } }
  metadata { key value }
  collections { id name slug }
}
"
    };
}

macro_rules! checkout_fields {
    () => {
        "fragment MarketplaceCheckoutFields on Checkout {
  id
  channel { slug }
  lines { id quantity variant { id } }
}
"
    };
}

operation!(MarketplaceProducts, marketplace_products);
operation!(MarketplaceProductDetail, marketplace_product_detail);
operation!(ChannelBySlug, channel_by_slug);
operation!(CheckoutCreate, checkout_create);
operation!(CheckoutById, checkout_by_id);
operation!(CheckoutAddLine, checkout_add_line);
operation!(CheckoutDeleteLines, checkout_delete_lines);

pub mod marketplace_products {
    use serde::{Deserialize, Serialize};

    use agent_marketplace_core::catalog::AttributeFilter;
    use agent_marketplace_core::offering::RawProduct;

    pub const OPERATION_NAME: &str = "MarketplaceProducts";
    pub const QUERY: &str = concat!(
        "query MarketplaceProducts($first: Int!, $channel: String!, $filter: ProductFilterInput, $sortBy: ProductOrder) {
  products(first: $first, channel: $channel, filter: $filter, sortBy: $sortBy) {
    totalCount
    edges { node { ...MarketplaceProductFields } }
  }
}
",
        product_fields!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub first: i64,
        pub channel: String,
        pub filter: Option<ProductFilterInput>,
        pub sort_by: Option<ProductOrder>,
    }

    #[derive(Debug, Clone, Default, Serialize)]
    pub struct ProductFilterInput {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub attributes: Option<AttributeFilter>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub search: Option<String>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ProductOrder {
        pub field: &'static str,
        pub direction: &'static str,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub products: Option<ProductConnection>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductConnection {
        pub total_count: Option<i64>,
        #[serde(default)]
        pub edges: Vec<ProductEdge>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ProductEdge {
        pub node: RawProduct,
    }
}

pub mod marketplace_product_detail {
    use serde::{Deserialize, Serialize};

    use agent_marketplace_core::offering::RawProduct;

    pub const OPERATION_NAME: &str = "MarketplaceProductDetail";
    pub const QUERY: &str = concat!(
        "query MarketplaceProductDetail($slug: String!, $channel: String!) {
  product(slug: $slug, channel: $channel) {
    ...MarketplaceProductFields
    variants {
      id
      name
      sku
      pricing { price { gross { amount currency } } }
      attributes { attribute { slug name } values { slug name } }
      metadata { key value }
    }
  }
}
",
        product_fields!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub slug: String,
        pub channel: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub product: Option<RawProduct>,
    }
}

pub mod channel_by_slug {
    use serde::{Deserialize, Serialize};

    use crate::saleor::types::Channel;

    pub const OPERATION_NAME: &str = "Channel";
    pub const QUERY: &str = "query Channel($slug: String!) {
  channel(slug: $slug) { id slug name isActive currencyCode }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub slug: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub channel: Option<Channel>,
    }
}

/// Shapes shared by the checkout operations.
pub mod checkout_fields {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Deserialize)]
    pub struct CheckoutFields {
        pub id: String,
        pub channel: ChannelRef,
        #[serde(default)]
        pub lines: Vec<CheckoutLineFields>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ChannelRef {
        pub slug: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CheckoutLineFields {
        pub id: String,
        pub quantity: i64,
        pub variant: VariantRef,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct VariantRef {
        pub id: String,
    }

    /// A field-level error reported by a checkout mutation.
    #[derive(Debug, Clone, Deserialize)]
    pub struct CheckoutFieldError {
        pub field: Option<String>,
        pub message: Option<String>,
        pub code: String,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CheckoutLineInput {
        pub quantity: i64,
        pub variant_id: String,
    }
}

pub mod checkout_create {
    use serde::{Deserialize, Serialize};

    pub use super::checkout_fields::{CheckoutFieldError, CheckoutLineInput};

    pub const OPERATION_NAME: &str = "CheckoutCreate";
    pub const QUERY: &str = "mutation CheckoutCreate($channel: String!, $email: String, $lines: [CheckoutLineInput!]!) {
  checkoutCreate(input: { channel: $channel, email: $email, lines: $lines }) {
    checkout { id }
    errors { field message code }
  }
}
";

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub channel: String,
        pub email: Option<String>,
        pub lines: Vec<CheckoutLineInput>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub checkout_create: Option<CheckoutCreatePayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CheckoutCreatePayload {
        pub checkout: Option<CreatedCheckout>,
        #[serde(default)]
        pub errors: Vec<CheckoutFieldError>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CreatedCheckout {
        pub id: String,
    }
}

pub mod checkout_by_id {
    use serde::{Deserialize, Serialize};

    pub use super::checkout_fields::CheckoutFields;

    pub const OPERATION_NAME: &str = "Checkout";
    pub const QUERY: &str = concat!(
        "query Checkout($id: ID!) {
  checkout(id: $id) { ...MarketplaceCheckoutFields }
}
",
        checkout_fields!()
    );

    #[derive(Debug, Clone, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct ResponseData {
        pub checkout: Option<CheckoutFields>,
    }
}

pub mod checkout_add_line {
    use serde::{Deserialize, Serialize};

    pub use super::checkout_fields::{CheckoutFieldError, CheckoutFields};

    pub const OPERATION_NAME: &str = "CheckoutAddLine";
    pub const QUERY: &str = concat!(
        "mutation CheckoutAddLine($id: ID!, $productVariantId: ID!) {
  checkoutLinesAdd(id: $id, lines: [{ quantity: 1, variantId: $productVariantId }]) {
    checkout { ...MarketplaceCheckoutFields }
    errors { field message code }
  }
}
",
        checkout_fields!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub product_variant_id: String,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub checkout_lines_add: Option<CheckoutLinesPayload>,
    }

    #[derive(Debug, Clone, Deserialize)]
    pub struct CheckoutLinesPayload {
        pub checkout: Option<CheckoutFields>,
        #[serde(default)]
        pub errors: Vec<CheckoutFieldError>,
    }
}

pub mod checkout_delete_lines {
    use serde::{Deserialize, Serialize};

    pub use super::checkout_add_line::CheckoutLinesPayload;

    pub const OPERATION_NAME: &str = "CheckoutDeleteLines";
    pub const QUERY: &str = concat!(
        "mutation CheckoutDeleteLines($checkoutId: ID!, $lineIds: [ID!]!) {
  checkoutLinesDelete(id: $checkoutId, linesIds: $lineIds) {
    checkout { ...MarketplaceCheckoutFields }
    errors { field message code }
  }
}
",
        checkout_fields!()
    );

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub checkout_id: String,
        pub line_ids: Vec<String>,
    }

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub checkout_lines_delete: Option<CheckoutLinesPayload>,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use agent_marketplace_core::catalog::{FilterState, compile};

    #[test]
    fn test_products_body_omits_absent_filter_fields() {
        let body = MarketplaceProducts::build_query(marketplace_products::Variables {
            first: 20,
            channel: "default-channel".to_string(),
            filter: Some(marketplace_products::ProductFilterInput {
                attributes: compile(&FilterState::from_pairs([("trust", "verified")]), None),
                search: None,
            }),
            sort_by: Some(marketplace_products::ProductOrder {
                field: "NAME",
                direction: "ASC",
            }),
        });

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["operationName"], "MarketplaceProducts");
        assert_eq!(
            value["variables"]["filter"],
            json!({ "attributes": [{ "slug": "gsv_verified", "values": ["true"] }] })
        );
        assert_eq!(value["variables"]["sortBy"]["field"], "NAME");
    }

    #[test]
    fn test_documents_include_their_fragments() {
        assert!(marketplace_products::QUERY.contains("fragment MarketplaceProductFields"));
        assert!(marketplace_product_detail::QUERY.contains("fragment MarketplaceProductFields"));
        assert!(checkout_add_line::QUERY.contains("fragment MarketplaceCheckoutFields"));
        assert!(checkout_delete_lines::QUERY.contains("linesIds: $lineIds"));
    }

    #[test]
    fn test_add_line_payload_parses_field_errors() {
        let data: checkout_add_line::ResponseData = serde_json::from_value(json!({
            "checkoutLinesAdd": {
                "checkout": null,
                "errors": [{ "field": "quantity", "message": "out of stock", "code": "INSUFFICIENT_STOCK" }]
            }
        }))
        .unwrap();

        let payload = data.checkout_lines_add.unwrap();
        assert!(payload.checkout.is_none());
        assert_eq!(payload.errors.first().unwrap().message.as_deref(), Some("out of stock"));
    }
}
