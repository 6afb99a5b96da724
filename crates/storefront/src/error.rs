//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::saleor::SaleorError;

/// Application-level error type for the marketplace.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Saleor API operation failed.
    #[error("Saleor error: {0}")]
    Saleor(#[from] SaleorError),

    /// Checkout session operation failed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Saleor(err) => saleor_status(err),
            Self::Checkout(err) => match err {
                CheckoutError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
                CheckoutError::NoSession { .. } | CheckoutError::LineNotInSession { .. } => {
                    StatusCode::CONFLICT
                }
                CheckoutError::Backend(err) => saleor_status(err),
                CheckoutError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show the caller. Backend rejections pass through
    /// verbatim; internal details never do.
    fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Saleor(SaleorError::NotFound(what)) => format!("Not found: {what}"),
            Self::Saleor(_) | Self::Checkout(CheckoutError::Backend(_)) => {
                "External service error".to_string()
            }
            Self::Checkout(CheckoutError::Rejected(message)) => message.clone(),
            Self::Checkout(CheckoutError::NoSession { .. }) => {
                "No checkout in progress".to_string()
            }
            Self::Checkout(CheckoutError::LineNotInSession { .. }) => {
                "Line is not part of your checkout".to_string()
            }
            Self::Checkout(CheckoutError::Store(_)) => "Session error".to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }
}

const fn saleor_status(err: &SaleorError) -> StatusCode {
    match err {
        SaleorError::NotFound(_) => StatusCode::NOT_FOUND,
        SaleorError::UserError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, self.public_message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for visitor actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("checkout", "Added line", Some(&[("variant_id", "UHJvZHVjdFZhcmlhbnQ6MQ==")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
