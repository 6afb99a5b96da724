//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tower_sessions::Session;

use crate::checkout::CheckoutSessionManager;
use crate::config::MarketplaceConfig;
use crate::middleware::SessionCheckoutIds;
use crate::saleor::{SaleorClient, SaleorError};

/// Checkout manager for one request: Saleor as backend, the visitor's
/// session as id store.
pub type RequestCheckout = CheckoutSessionManager<SaleorClient, SessionCheckoutIds>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MarketplaceConfig,
    pool: PgPool,
    saleor: SaleorClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the Saleor HTTP client cannot be built.
    pub fn new(config: MarketplaceConfig, pool: PgPool) -> Result<Self, SaleorError> {
        let saleor = SaleorClient::new(&config.saleor)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                saleor,
            }),
        })
    }

    /// Get a reference to the marketplace configuration.
    #[must_use]
    pub fn config(&self) -> &MarketplaceConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the Saleor API client.
    #[must_use]
    pub fn saleor(&self) -> &SaleorClient {
        &self.inner.saleor
    }

    /// Checkout manager bound to the visitor's session.
    #[must_use]
    pub fn checkout(&self, session: Session) -> RequestCheckout {
        CheckoutSessionManager::new(self.saleor().clone(), SessionCheckoutIds::new(session))
    }
}
