//! Session middleware configuration and the session-backed checkout id store.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions. The session
//! cookie is the visitor's only handle on their checkouts.

use async_trait::async_trait;
use sqlx::PgPool;
use tower_sessions::{Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use agent_marketplace_core::{ChannelSlug, CheckoutId};

use crate::checkout::{CheckoutError, CheckoutIdStore};
use crate::config::MarketplaceConfig;
use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "mp_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The sessions table is created by `mp-cli migrate`, not on startup.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &MarketplaceConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Checkout ids kept in the visitor's session, one per channel.
#[derive(Clone)]
pub struct SessionCheckoutIds {
    session: Session,
}

impl SessionCheckoutIds {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl CheckoutIdStore for SessionCheckoutIds {
    async fn get(&self, channel: &ChannelSlug) -> Result<Option<CheckoutId>, CheckoutError> {
        self.session
            .get::<CheckoutId>(&session_keys::checkout_id(channel))
            .await
            .map_err(store_error)
    }

    /// Writes through to the session store before returning, so the id
    /// survives even if the rest of the request fails.
    async fn set(&self, channel: &ChannelSlug, id: &CheckoutId) -> Result<(), CheckoutError> {
        self.session
            .insert(&session_keys::checkout_id(channel), id)
            .await
            .map_err(store_error)?;
        self.session.save().await.map_err(store_error)
    }
}

fn store_error(err: tower_sessions::session::Error) -> CheckoutError {
    CheckoutError::Store(err.to_string())
}
