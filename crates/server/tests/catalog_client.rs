//! Catalog client tests against a local stub server.
//!
//! The stub speaks just enough of the Unsplash search API to exercise the
//! client: authorization header, query parameters, rate-limit and error
//! status mapping.

#![allow(clippy::unwrap_used)]

use axum::Router;
use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use secrecy::SecretString;
use std::collections::HashMap;

use shutterfinch_core::SearchTerm;
use shutterfinch_server::catalog::{CatalogClient, CatalogError};
use shutterfinch_server::config::CatalogConfig;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ACCESS_KEY: &str = "stub-access-key";

const PAGE_JSON: &str = r#"{
    "total": 2,
    "total_pages": 1,
    "results": [
        {
            "id": "img-1",
            "urls": {
                "full": "https://images.example/1/full",
                "regular": "https://images.example/1/regular",
                "small": "https://images.example/1/small",
                "thumb": "https://images.example/1/thumb"
            },
            "description": "First image",
            "alt_description": null
        },
        {
            "id": "img-2",
            "urls": {
                "full": "https://images.example/2/full",
                "regular": "https://images.example/2/regular",
                "small": "https://images.example/2/small",
                "thumb": "https://images.example/2/thumb"
            },
            "description": null,
            "alt_description": "Second image"
        }
    ]
}"#;

/// Serve the router on an ephemeral local port and return its base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> CatalogClient {
    CatalogClient::new(&CatalogConfig {
        api_url: base_url.to_string(),
        access_key: SecretString::from(ACCESS_KEY),
    })
}

fn term(s: &str) -> SearchTerm {
    SearchTerm::parse(s).unwrap()
}

// ---------------------------------------------------------------------------
// Test: Successful search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_parses_a_result_page() {
    let router = Router::new().route(
        "/search/photos",
        get(|| async { ([("content-type", "application/json")], PAGE_JSON) }),
    );
    let base_url = spawn_stub(router).await;

    let page = client_for(&base_url)
        .search(&term("coffee"), 1, 16)
        .await
        .unwrap();

    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.results.len(), 2);
    let first = page.results.first().unwrap();
    assert_eq!(first.id, "img-1");
    assert_eq!(first.urls.thumb, "https://images.example/1/thumb");
}

#[tokio::test]
async fn search_sends_client_id_auth_and_paging_params() {
    let router = Router::new().route(
        "/search/photos",
        get(
            |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                // A failed assertion panics the handler, which surfaces as a
                // non-success status on the client side.
                assert_eq!(
                    headers.get("authorization").unwrap(),
                    &format!("Client-ID {ACCESS_KEY}")
                );
                assert_eq!(params.get("query").map(String::as_str), Some("mountain lake"));
                assert_eq!(params.get("page").map(String::as_str), Some("3"));
                assert_eq!(params.get("per_page").map(String::as_str), Some("16"));

                (
                    [("content-type", "application/json")],
                    r#"{"total": 0, "total_pages": 0, "results": []}"#,
                )
            },
        ),
    );
    let base_url = spawn_stub(router).await;

    let page = client_for(&base_url)
        .search(&term("mountain lake"), 3, 16)
        .await
        .unwrap();

    assert_eq!(page.total, 0);
    assert!(page.results.is_empty());
}

// ---------------------------------------------------------------------------
// Test: Error mapping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rate_limit_maps_to_retry_after_seconds() {
    let router = Router::new().route(
        "/search/photos",
        get(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                [("retry-after", "30")],
                "Rate Limit Exceeded",
            )
        }),
    );
    let base_url = spawn_stub(router).await;

    let err = client_for(&base_url)
        .search(&term("coffee"), 1, 16)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::RateLimited(30)));
}

#[tokio::test]
async fn rate_limit_without_header_defaults_to_one_second() {
    let router = Router::new().route(
        "/search/photos",
        get(|| async { (StatusCode::TOO_MANY_REQUESTS, "Rate Limit Exceeded") }),
    );
    let base_url = spawn_stub(router).await;

    let err = client_for(&base_url)
        .search(&term("coffee"), 1, 16)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::RateLimited(1)));
}

#[tokio::test]
async fn non_success_status_maps_to_status_error() {
    let router = Router::new().route(
        "/search/photos",
        get(|| async { (StatusCode::UNAUTHORIZED, "OAuth error: invalid access token") }),
    );
    let base_url = spawn_stub(router).await;

    let err = client_for(&base_url)
        .search(&term("coffee"), 1, 16)
        .await
        .unwrap_err();

    match err {
        CatalogError::Status { status, message } => {
            assert_eq!(status.as_u16(), 401);
            assert!(message.contains("invalid access token"));
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_parse_error() {
    let router = Router::new().route(
        "/search/photos",
        get(|| async { ([("content-type", "application/json")], "{\"total\": ") }),
    );
    let base_url = spawn_stub(router).await;

    let err = client_for(&base_url)
        .search(&term("coffee"), 1, 16)
        .await
        .unwrap_err();

    assert!(matches!(err, CatalogError::Parse(_)));
}
