//! Shutterfinch server library.
//!
//! This crate provides the API server functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use state::AppState;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// CORS layer allowing credentialed requests from the configured client origin.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    match config.client_url.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        // With no allowed origin, credentialed cross-origin requests fail closed
        Err(e) => tracing::error!("invalid CLIENT_URL for CORS: {}", e),
    }

    cors
}

/// Build the application router with its full middleware stack.
///
/// Sentry tower layers are added by the binary so tests can run without a
/// Sentry hub.
#[must_use]
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.pool(), state.config());
    let cors = cors_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::propagate_request_id))
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
