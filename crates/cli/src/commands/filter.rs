//! Compile a facet query string into the attribute filter Saleor receives.
//!
//! # Usage
//!
//! ```bash
//! mp-cli filter 'roles=sales,hr&trust=verified'
//! mp-cli filter 'capabilities=summarize' --pin category=agent
//! ```

use agent_marketplace_core::catalog::{
    ATTRIBUTE_SCHEMA_VERSION, AttributeFilter, FilterState, PinnedFacet, compile,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid query string segment {0:?}: {1}")]
    Decode(String, std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Split a query string into decoded `key=value` pairs. A leading `?` is
/// ignored and `+` decodes to a space.
fn query_pairs(query: &str) -> Result<Vec<(String, String)>, FilterError> {
    let decode = |raw: &str| {
        urlencoding::decode(&raw.replace('+', " "))
            .map(std::borrow::Cow::into_owned)
            .map_err(|e| FilterError::Decode(raw.to_string(), e))
    };

    query
        .trim_start_matches('?')
        .split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            Ok((decode(key)?, decode(value)?))
        })
        .collect()
}

/// Compiled filter tagged with the attribute schema it targets.
#[derive(Debug, Serialize)]
struct CompiledFilter {
    schema_version: &'static str,
    attributes: Option<AttributeFilter>,
}

/// Compile `query` with an optional pin and render the result as JSON.
///
/// `attributes` is `null` when nothing is selected, matching an omitted
/// filter argument.
///
/// # Errors
///
/// Returns an error if the query string is not valid percent-encoding.
pub fn render(query: &str, pin: Option<&PinnedFacet>) -> Result<String, FilterError> {
    let state = FilterState::from_pairs(query_pairs(query)?);
    let compiled = CompiledFilter {
        schema_version: ATTRIBUTE_SCHEMA_VERSION,
        attributes: compile(&state, pin),
    };
    Ok(serde_json::to_string_pretty(&compiled)?)
}

/// Print the compiled filter.
///
/// # Errors
///
/// Returns an error if the query string cannot be decoded.
pub fn run(query: &str, pin: Option<&PinnedFacet>) -> Result<(), FilterError> {
    let rendered = render(query, pin)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agent_marketplace_core::catalog::Facet;
    use serde_json::{Value, json};

    use super::*;

    #[test]
    fn test_query_pairs_decode() {
        let pairs = query_pairs("?roles=sales%2Cmarketing&q=crm+sync&flag").unwrap();

        assert_eq!(
            pairs,
            [
                ("roles".to_string(), "sales,marketing".to_string()),
                ("q".to_string(), "crm sync".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_empty_query_renders_null_attributes() {
        let value: Value = serde_json::from_str(&render("", None).unwrap()).unwrap();
        assert_eq!(
            value,
            json!({ "schema_version": ATTRIBUTE_SCHEMA_VERSION, "attributes": null })
        );
    }

    #[test]
    fn test_render_with_pin() {
        let pin = PinnedFacet::new(Facet::Roles, "sales");
        let rendered = render("roles=hr", Some(&pin)).unwrap();

        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["schema_version"], "v1");
        assert_eq!(
            value["attributes"],
            json!([{ "slug": "gsv_roles", "values": ["sales", "hr"] }])
        );
    }
}
