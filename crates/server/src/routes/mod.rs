//! HTTP route handlers for the server.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//! GET  /health/ready               - Readiness check (DB ping)
//!
//! # Auth (OAuth authorization-code flow)
//! GET  /auth/{provider}            - Redirect to provider authorization
//! GET  /auth/{provider}/callback   - Handle OAuth callback
//! GET  /auth/me                    - Current user profile (requires auth)
//! POST /auth/logout                - Logout action
//! GET  /logout                     - Logout alias
//!
//! # Search (requires auth unless noted)
//! POST /api/search                 - Search the image catalog
//! GET  /api/top-searches           - Site-wide trending terms (open)
//! GET  /api/history                - Per-user search history
//!
//! # Collections (requires auth)
//! POST /api/downloads              - Record a batch of downloads
//! GET  /api/downloads              - Download history
//! POST /api/favourites             - Add or remove a favourite
//! GET  /api/favourites             - Favourites list
//! ```

pub mod auth;
pub mod downloads;
pub mod favourites;
pub mod search;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Liveness check.
///
/// # Route
///
/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check: pings the database.
///
/// # Route
///
/// `GET /health/ready`
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(state.pool()).await {
        Ok(_) => (StatusCode::OK, "ready"),
        Err(e) => {
            tracing::error!("readiness check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/{provider}", get(auth::login))
        .route("/{provider}/callback", get(auth::callback))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/search", post(search::search))
        .route("/top-searches", get(search::top_searches))
        .route("/history", get(search::history))
        .route(
            "/downloads",
            get(downloads::list).post(downloads::record),
        )
        .route(
            "/favourites",
            get(favourites::list).post(favourites::toggle),
        )
}

/// Create all routes for the server.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Health checks (not rate limited)
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Logout alias kept from the original client contract
        .route("/logout", get(auth::logout))
        // Auth routes (strict rate limit)
        .nest("/auth", auth_routes().layer(auth_rate_limiter()))
        // API routes (relaxed rate limit)
        .nest("/api", api_routes().layer(api_rate_limiter()))
}
