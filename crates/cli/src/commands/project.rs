//! Project raw Saleor product JSON into offerings.
//!
//! # Usage
//!
//! ```bash
//! mp-cli project product.json
//! mp-cli project products.json --detail
//! ```
//!
//! The file holds one product object or an array of them, in the shape the
//! storefront's product queries return.

use std::path::Path;

use agent_marketplace_core::offering::{RawProduct, project, project_detail};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_products(input: &str) -> Result<Vec<RawProduct>, ProjectError> {
    let value: Value = serde_json::from_str(input)?;
    let products = if value.is_array() {
        serde_json::from_value(value)?
    } else {
        vec![serde_json::from_value(value)?]
    };
    Ok(products)
}

/// Project every product in `input` and render the result as JSON.
///
/// # Errors
///
/// Returns an error if `input` is not a product object or array.
pub fn render(input: &str, detail: bool) -> Result<String, ProjectError> {
    let products = parse_products(input)?;
    let rendered = if detail {
        let details: Vec<_> = products.iter().map(project_detail).collect();
        serde_json::to_string_pretty(&details)?
    } else {
        let offerings: Vec<_> = products.iter().map(project).collect();
        serde_json::to_string_pretty(&offerings)?
    };
    Ok(rendered)
}

/// Print the projection of the products in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn run(path: &Path, detail: bool) -> Result<(), ProjectError> {
    let input = std::fs::read_to_string(path).map_err(|source| ProjectError::Read {
        path: path.display().to_string(),
        source,
    })?;

    let rendered = render(&input, detail)?;
    tracing::debug!(path = %path.display(), detail, "Projected products");

    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PRODUCT: &str = r#"{
        "id": "UHJvZHVjdDox",
        "name": "Inbox Triage",
        "slug": "inbox-triage",
        "attributes": [
            {
                "attribute": { "slug": "gsv_category", "name": "Category" },
                "values": [{ "slug": "automation", "name": "Automation" }]
            }
        ],
        "variants": null
    }"#;

    #[test]
    fn test_single_object_and_array_are_accepted() {
        assert_eq!(parse_products(PRODUCT).unwrap().len(), 1);
        assert_eq!(
            parse_products(&format!("[{PRODUCT}, {PRODUCT}]"))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_render_listing() {
        let value: Value = serde_json::from_str(&render(PRODUCT, false).unwrap()).unwrap();

        let first = value.as_array().and_then(|items| items.first()).unwrap();
        assert_eq!(first["category"], "automation");
        assert!(first.get("plans").is_none());
    }

    #[test]
    fn test_render_detail_includes_fallback_plan() {
        let value: Value = serde_json::from_str(&render(PRODUCT, true).unwrap()).unwrap();

        let first = value.as_array().and_then(|items| items.first()).unwrap();
        assert_eq!(first["plans"][0]["id"], "default-trial");
        assert_eq!(first["languages"], serde_json::json!(["en"]));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            render("not json", false),
            Err(ProjectError::Json(_))
        ));
    }
}
