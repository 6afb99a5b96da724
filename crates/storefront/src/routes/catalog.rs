//! Catalog route handlers: the listing and the four kinds of landing page.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use agent_marketplace_core::ChannelSlug;
use agent_marketplace_core::catalog::{
    FilterState, LandingKind, LandingPage, PinnedFacet, compile, find_landing,
};
use agent_marketplace_core::offering::{Offering, project};

use crate::error::{AppError, Result};
use crate::saleor::{ProductListing, ProductSort};
use crate::state::AppState;

use super::active_channel;

/// Query keys that are not facets.
const SORT_PARAM: &str = "sort";
const SEARCH_PARAMS: [&str; 2] = ["q", "query"];

/// Raw query pairs, split into facet selections, sort and search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub filters: FilterState,
    pub sort: ProductSort,
    pub search: Option<String>,
}

impl ListingQuery {
    /// Split query pairs. `q` wins over `query` when both are present; a
    /// blank search is no search.
    #[must_use]
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let search = SEARCH_PARAMS
            .into_iter()
            .find_map(|key| param(pairs, key))
            .map(String::from);
        let filters = FilterState::from_pairs(
            pairs
                .iter()
                .filter(|(k, _)| k != SORT_PARAM && !SEARCH_PARAMS.contains(&k.as_str()))
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        Self {
            filters,
            sort: ProductSort::from_param(param(pairs, SORT_PARAM)),
            search,
        }
    }

    fn listing(&self, pinned: Option<&PinnedFacet>) -> ProductListing {
        ProductListing {
            attributes: compile(&self.filters, pinned),
            search: self.search.clone(),
            sort: self.sort,
            ..ProductListing::default()
        }
    }
}

/// First non-blank value of `key`.
fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.trim())
        .find(|v| !v.is_empty())
}

/// A page of projected offerings.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub channel: ChannelSlug,
    pub filters: FilterState,
    pub sort: ProductSort,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub total_count: Option<i64>,
    pub offerings: Vec<Offering>,
}

/// A landing page and the offerings it pins.
#[derive(Debug, Serialize)]
pub struct LandingResponse {
    pub kind: LandingKind,
    pub landing: LandingPage,
    #[serde(flatten)]
    pub listing: ListingResponse,
}

/// Run a listing query and project every product.
async fn list(
    state: &AppState,
    channel: ChannelSlug,
    query: ListingQuery,
    pinned: Option<&PinnedFacet>,
) -> Result<ListingResponse> {
    let page = state
        .saleor()
        .list_products(&channel, &query.listing(pinned))
        .await?;

    Ok(ListingResponse {
        channel,
        filters: query.filters,
        sort: query.sort,
        search: query.search,
        total_count: page.total_count,
        offerings: page.products.iter().map(project).collect(),
    })
}

/// Display the offering listing.
#[instrument(skip(state, pairs))]
pub async fn index(
    State(state): State<AppState>,
    Path(channel): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ListingResponse>> {
    let channel = active_channel(&state, &channel).await?;
    let query = ListingQuery::from_pairs(&pairs);

    Ok(Json(list(&state, channel, query, None).await?))
}

async fn landing(
    state: &AppState,
    channel: &str,
    kind: LandingKind,
    slug: &str,
    pairs: &[(String, String)],
) -> Result<LandingResponse> {
    let channel = active_channel(state, channel).await?;
    let landing = *find_landing(kind, slug)
        .ok_or_else(|| AppError::NotFound(format!("{kind:?} page {slug}")))?;

    let pinned = landing.pin(kind);
    let listing = list(state, channel, ListingQuery::from_pairs(pairs), Some(&pinned)).await?;

    Ok(LandingResponse {
        kind,
        landing,
        listing,
    })
}

/// Display a category landing page.
#[instrument(skip(state, pairs))]
pub async fn category(
    State(state): State<AppState>,
    Path((channel, category)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LandingResponse>> {
    landing(&state, &channel, LandingKind::Category, &category, &pairs)
        .await
        .map(Json)
}

/// Display a role (solutions) landing page.
#[instrument(skip(state, pairs))]
pub async fn role(
    State(state): State<AppState>,
    Path((channel, role)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LandingResponse>> {
    landing(&state, &channel, LandingKind::Role, &role, &pairs)
        .await
        .map(Json)
}

/// Display an outcome landing page.
#[instrument(skip(state, pairs))]
pub async fn outcome(
    State(state): State<AppState>,
    Path((channel, outcome)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LandingResponse>> {
    landing(&state, &channel, LandingKind::Outcome, &outcome, &pairs)
        .await
        .map(Json)
}

/// Display a capability landing page.
#[instrument(skip(state, pairs))]
pub async fn capability(
    State(state): State<AppState>,
    Path((channel, capability)): Path<(String, String)>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<LandingResponse>> {
    landing(&state, &channel, LandingKind::Capability, &capability, &pairs)
        .await
        .map(Json)
}
