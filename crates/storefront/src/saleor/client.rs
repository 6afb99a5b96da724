//! Saleor API client implementation.
//!
//! Uses `graphql_client` envelopes with `reqwest` 0.13 for HTTP.
//! Caches catalog queries and channel lookups using `moka`.

use std::sync::Arc;

use async_trait::async_trait;
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use agent_marketplace_core::offering::RawProduct;
use agent_marketplace_core::{ChannelSlug, Checkout, CheckoutId, CheckoutLineId, VariantId};

use crate::checkout::{CheckoutBackend, NewCheckoutLine};
use crate::config::SaleorConfig;

use super::cache::CacheValue;
use super::conversions::{convert_checkout, join_field_errors};
use super::queries::{
    ChannelBySlug, CheckoutAddLine, CheckoutById, CheckoutCreate, CheckoutDeleteLines,
    MarketplaceProductDetail, MarketplaceProducts, channel_by_slug, checkout_add_line,
    checkout_by_id, checkout_create, checkout_delete_lines, marketplace_product_detail,
    marketplace_products,
};
use super::types::{Channel, ProductListing, ProductPage};
use super::{GraphQLError, GraphQLErrorLocation, SaleorError};

const CACHE_CAPACITY: u64 = 1000;

/// Client for the Saleor GraphQL API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct SaleorClient {
    inner: Arc<SaleorClientInner>,
}

struct SaleorClientInner {
    client: reqwest::Client,
    endpoint: String,
    app_token: Option<SecretString>,
    cache: Cache<String, CacheValue>,
}

impl SaleorClient {
    /// Create a new Saleor API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SaleorConfig) -> Result<Self, SaleorError> {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(SaleorClientInner {
                client,
                endpoint: config.api_url.to_string(),
                app_token: config.app_token.clone(),
                cache,
            }),
        })
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, SaleorError>
    where
        Q::Variables: serde::Serialize,
    {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json");
        if let Some(token) = &self.inner.app_token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.json(&request_body).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SaleorError::RateLimited(retry_after));
        }

        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Saleor API returned non-success status"
            );
            return Err(SaleorError::GraphQL(vec![GraphQLError::message(format!(
                "HTTP {status}: {}",
                response_text.chars().take(200).collect::<String>()
            ))]));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Saleor GraphQL response"
                );
                return Err(SaleorError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            tracing::debug!(errors = ?errors, "GraphQL errors in response");

            return Err(SaleorError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                "Saleor GraphQL response has no data and no errors"
            );
            SaleorError::GraphQL(vec![GraphQLError::message("No data in response")])
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List products in a channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, listing), fields(channel = %channel, sort = ?listing.sort))]
    pub async fn list_products(
        &self,
        channel: &ChannelSlug,
        listing: &ProductListing,
    ) -> Result<ProductPage, SaleorError> {
        let cache_key = listing.cache_key(channel);

        if let Some(CacheValue::Products(page)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return Ok(page);
        }

        let filter = (listing.attributes.is_some() || listing.search.is_some()).then(|| {
            marketplace_products::ProductFilterInput {
                attributes: listing.attributes.clone(),
                search: listing.search.clone(),
            }
        });

        let variables = marketplace_products::Variables {
            first: listing.first,
            channel: channel.to_string(),
            filter,
            sort_by: Some(marketplace_products::ProductOrder {
                field: listing.sort.order_field(),
                direction: "ASC",
            }),
        };

        let data = self.execute::<MarketplaceProducts>(variables).await?;

        let page = data.products.map_or_else(ProductPage::default, |connection| ProductPage {
            total_count: connection.total_count,
            products: connection.edges.into_iter().map(|edge| edge.node).collect(),
        });

        self.inner
            .cache
            .insert(cache_key, CacheValue::Products(page.clone()))
            .await;

        Ok(page)
    }

    /// Get a product with its variants by slug.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError::NotFound` if no product has this slug in the
    /// channel, or an error if the API request fails.
    #[instrument(skip(self), fields(channel = %channel, slug = %slug))]
    pub async fn product_by_slug(
        &self,
        channel: &ChannelSlug,
        slug: &str,
    ) -> Result<RawProduct, SaleorError> {
        let cache_key = format!("product:{channel}:{slug}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = marketplace_product_detail::Variables {
            slug: slug.to_string(),
            channel: channel.to_string(),
        };

        let data = self.execute::<MarketplaceProductDetail>(variables).await?;

        let product = data
            .product
            .ok_or_else(|| SaleorError::NotFound(format!("Product not found: {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Look up a channel by slug. Unknown channels are cached as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(channel = %slug))]
    pub async fn channel(&self, slug: &ChannelSlug) -> Result<Option<Channel>, SaleorError> {
        let cache_key = format!("channel:{slug}");

        if let Some(CacheValue::Channel(channel)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for channel");
            return Ok(channel);
        }

        let variables = channel_by_slug::Variables {
            slug: slug.to_string(),
        };

        let data = self.execute::<ChannelBySlug>(variables).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Channel(data.channel.clone()))
            .await;

        Ok(data.channel)
    }

    // =========================================================================
    // Checkout (never cached)
    // =========================================================================

    /// Create a checkout in a channel.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError::UserError` with the backend's field errors, or an
    /// error if the API request fails.
    #[instrument(skip(self, email, lines), fields(channel = %channel, lines = lines.len()))]
    pub async fn create_checkout(
        &self,
        channel: &ChannelSlug,
        email: Option<&str>,
        lines: &[NewCheckoutLine],
    ) -> Result<CheckoutId, SaleorError> {
        let variables = checkout_create::Variables {
            channel: channel.to_string(),
            email: email.map(str::to_string),
            lines: lines
                .iter()
                .map(|line| checkout_create::CheckoutLineInput {
                    quantity: i64::from(line.quantity),
                    variant_id: line.variant_id.to_string(),
                })
                .collect(),
        };

        let data = self.execute::<CheckoutCreate>(variables).await?;

        if let Some(result) = data.checkout_create {
            if !result.errors.is_empty() {
                return Err(SaleorError::UserError(join_field_errors(&result.errors)));
            }

            if let Some(checkout) = result.checkout {
                return Ok(CheckoutId::new(checkout.id));
            }
        }

        Err(SaleorError::GraphQL(vec![GraphQLError::message(
            "Failed to create checkout",
        )]))
    }

    /// Get a checkout by id. Unknown or expired checkouts are `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(checkout_id = %id))]
    pub async fn get_checkout(&self, id: &CheckoutId) -> Result<Option<Checkout>, SaleorError> {
        let variables = checkout_by_id::Variables { id: id.to_string() };

        let data = self.execute::<CheckoutById>(variables).await?;

        Ok(data.checkout.map(convert_checkout))
    }

    /// Add one unit of a variant to a checkout.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError::UserError` with the backend's field errors, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(checkout_id = %id, variant_id = %variant_id))]
    pub async fn add_checkout_line(
        &self,
        id: &CheckoutId,
        variant_id: &VariantId,
    ) -> Result<Checkout, SaleorError> {
        let variables = checkout_add_line::Variables {
            id: id.to_string(),
            product_variant_id: variant_id.to_string(),
        };

        let data = self.execute::<CheckoutAddLine>(variables).await?;

        if let Some(result) = data.checkout_lines_add {
            if !result.errors.is_empty() {
                return Err(SaleorError::UserError(join_field_errors(&result.errors)));
            }

            if let Some(checkout) = result.checkout {
                return Ok(convert_checkout(checkout));
            }
        }

        Err(SaleorError::GraphQL(vec![GraphQLError::message(
            "Failed to add checkout line",
        )]))
    }

    /// Delete lines from a checkout.
    ///
    /// # Errors
    ///
    /// Returns `SaleorError::UserError` with the backend's field errors, or an
    /// error if the API request fails.
    #[instrument(skip(self, line_ids), fields(checkout_id = %id, lines = line_ids.len()))]
    pub async fn delete_checkout_lines(
        &self,
        id: &CheckoutId,
        line_ids: &[CheckoutLineId],
    ) -> Result<Checkout, SaleorError> {
        let variables = checkout_delete_lines::Variables {
            checkout_id: id.to_string(),
            line_ids: line_ids.iter().map(ToString::to_string).collect(),
        };

        let data = self.execute::<CheckoutDeleteLines>(variables).await?;

        if let Some(result) = data.checkout_lines_delete {
            if !result.errors.is_empty() {
                return Err(SaleorError::UserError(join_field_errors(&result.errors)));
            }

            if let Some(checkout) = result.checkout {
                return Ok(convert_checkout(checkout));
            }
        }

        Err(SaleorError::GraphQL(vec![GraphQLError::message(
            "Failed to delete checkout lines",
        )]))
    }
}

#[async_trait]
impl CheckoutBackend for SaleorClient {
    async fn create_checkout(
        &self,
        channel: &ChannelSlug,
        email: Option<&str>,
        lines: &[NewCheckoutLine],
    ) -> Result<CheckoutId, SaleorError> {
        Self::create_checkout(self, channel, email, lines).await
    }

    async fn fetch_checkout(&self, id: &CheckoutId) -> Result<Option<Checkout>, SaleorError> {
        self.get_checkout(id).await
    }

    async fn add_line(
        &self,
        id: &CheckoutId,
        variant_id: &VariantId,
    ) -> Result<Checkout, SaleorError> {
        self.add_checkout_line(id, variant_id).await
    }

    async fn delete_lines(
        &self,
        id: &CheckoutId,
        line_ids: &[CheckoutLineId],
    ) -> Result<Checkout, SaleorError> {
        self.delete_checkout_lines(id, line_ids).await
    }
}
