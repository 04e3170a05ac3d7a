//! Postgres-backed session layer.
//!
//! Sessions ride an `sf_session` cookie and lapse after seven days of
//! inactivity. The backing `tower_sessions.session` table is created by
//! migration, not at startup.

use sqlx::PgPool;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::ServerConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sf_session";

/// Days of inactivity before a session lapses.
const INACTIVITY_DAYS: i64 = 7;

/// Build the session layer over the shared pool.
///
/// The cookie is marked secure only when the server itself is served over
/// HTTPS, so local development over plain HTTP keeps its sessions.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &ServerConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone());

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_path("/")
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_secure(config.base_url.starts_with("https://"))
        .with_expiry(Expiry::OnInactivity(Duration::days(INACTIVITY_DAYS)))
}
