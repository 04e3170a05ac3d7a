//! Health checks, 404s, request IDs, and the open endpoints.

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

use common::{body_json, body_text, get, test_app};

// ---------------------------------------------------------------------------
// Test: Health endpoints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../server/migrations")]
async fn health_returns_ok(pool: PgPool) {
    let response = get(test_app(pool), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[sqlx::test(migrations = "../server/migrations")]
async fn readiness_pings_the_database(pool: PgPool) {
    let response = get(test_app(pool), "/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ready");
}

// ---------------------------------------------------------------------------
// Test: Unknown routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../server/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let response = get(test_app(pool), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: Request ID propagation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../server/migrations")]
async fn responses_carry_a_request_id(pool: PgPool) {
    let response = get(test_app(pool), "/health").await;

    let request_id = response.headers().get("x-request-id");
    assert!(
        request_id.is_some(),
        "response must contain an x-request-id header"
    );

    // Generated IDs are UUIDs (36 chars with hyphens).
    let id = request_id.unwrap().to_str().unwrap();
    assert_eq!(id.len(), 36);
}

// ---------------------------------------------------------------------------
// Test: Trending terms are open
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../server/migrations")]
async fn top_searches_is_open_and_empty_on_a_fresh_database(pool: PgPool) {
    let response = get(test_app(pool), "/api/top-searches").await;

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json, serde_json::json!([]));
}
