//! Offering detail route handler.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use agent_marketplace_core::ChannelSlug;
use agent_marketplace_core::catalog::{LandingKind, find_landing};
use agent_marketplace_core::offering::{OfferingDetail, project_detail};

use crate::error::{AppError, Result};
use crate::saleor::SaleorError;
use crate::state::AppState;

use super::active_channel;

/// An offering with its plans.
#[derive(Debug, Serialize)]
pub struct DetailResponse {
    pub channel: ChannelSlug,
    /// Path under the offering's own category, which may differ from the
    /// category segment it was requested under.
    pub canonical_path: String,
    #[serde(flatten)]
    pub detail: OfferingDetail,
}

/// Display an offering.
///
/// The category segment must name a category page; the product itself is
/// looked up by slug alone.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path((channel, category, slug)): Path<(String, String, String)>,
) -> Result<Json<DetailResponse>> {
    let channel = active_channel(&state, &channel).await?;
    if find_landing(LandingKind::Category, &category).is_none() {
        return Err(AppError::NotFound(format!("category {category}")));
    }

    let product = state
        .saleor()
        .product_by_slug(&channel, &slug)
        .await
        .map_err(|e| match e {
            SaleorError::NotFound(_) => AppError::NotFound(format!("offering {slug}")),
            other => AppError::Saleor(other),
        })?;

    let detail = project_detail(&product);
    let canonical_path = canonical_path(&channel, &detail);

    Ok(Json(DetailResponse {
        channel,
        canonical_path,
        detail,
    }))
}

fn canonical_path(channel: &ChannelSlug, detail: &OfferingDetail) -> String {
    format!(
        "/{channel}/marketplace/{}/{}",
        detail.offering.category.collection_slug(),
        urlencoding::encode(&detail.offering.slug)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agent_marketplace_core::offering::RawProduct;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_canonical_path_uses_resolved_category() {
        let product: RawProduct = serde_json::from_value(json!({
            "id": "UHJvZHVjdDox",
            "name": "Ledger Assistant",
            "slug": "ledger-assistant",
            "collections": [{ "slug": "assistants", "name": "Assistants" }]
        }))
        .unwrap();

        let detail = project_detail(&product);
        let path = canonical_path(&ChannelSlug::new("default-channel"), &detail);

        assert_eq!(path, "/default-channel/marketplace/assistants/ledger-assistant");
    }

    #[test]
    fn test_every_category_has_a_landing_page() {
        use agent_marketplace_core::offering::Category;

        for category in [
            Category::Agent,
            Category::App,
            Category::Assistant,
            Category::Automation,
        ] {
            assert!(
                find_landing(LandingKind::Category, category.collection_slug()).is_some(),
                "{category} has no landing page"
            );
        }
    }
}
