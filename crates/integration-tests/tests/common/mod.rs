//! Shared helpers for HTTP surface tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use secrecy::SecretString;
use sqlx::PgPool;
use tower::ServiceExt;

use shutterfinch_server::config::{CatalogConfig, OauthConfig, ProviderKeys, ServerConfig};
use shutterfinch_server::{AppState, app};

pub const CLIENT_URL: &str = "http://localhost:3000";

/// Build a test `ServerConfig` with safe defaults.
///
/// The base URL is plain HTTP so session cookies are not marked secure, and
/// the catalog URL points nowhere reachable; surface tests never get past
/// authentication to a catalog call.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        database_url: SecretString::from("postgres://unused"),
        host: "127.0.0.1".parse().expect("valid address"),
        port: 0,
        base_url: "http://localhost:5000".to_string(),
        client_url: CLIENT_URL.to_string(),
        session_secret: SecretString::from("0123456789abcdefghijklmnopqrstuv"),
        catalog: CatalogConfig {
            api_url: "http://127.0.0.1:9".to_string(),
            access_key: SecretString::from("test-access-key"),
        },
        oauth: OauthConfig {
            google: ProviderKeys {
                client_id: "google-client-id".to_string(),
                client_secret: SecretString::from("google-client-secret-value"),
            },
            facebook: ProviderKeys {
                client_id: "facebook-client-id".to_string(),
                client_secret: SecretString::from("facebook-client-secret-value"),
            },
            github: ProviderKeys {
                client_id: "github-client-id".to_string(),
                client_secret: SecretString::from("github-client-secret-value"),
            },
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Build the full application router over the given pool.
///
/// This is the same router construction `main.rs` uses, minus the Sentry
/// tower layers, so tests run without a Sentry hub.
pub fn test_app(pool: PgPool) -> Router {
    app(AppState::new(test_config(), pool))
}

/// Send a GET request.
///
/// Every request carries a forwarded client IP so the rate limiter can key it,
/// the way a reverse proxy would in production.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .uri(path)
        .header("x-forwarded-for", "127.0.0.1")
        .body(Body::empty())
        .expect("valid request");
    app.oneshot(request).await.expect("infallible")
}

/// Send a POST request with a JSON body.
pub async fn post_json(app: Router, path: &str, body: &serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", "127.0.0.1")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    app.oneshot(request).await.expect("infallible")
}

/// Send a POST request with an empty body.
pub async fn post(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header("x-forwarded-for", "127.0.0.1")
        .body(Body::empty())
        .expect("valid request");
    app.oneshot(request).await.expect("infallible")
}

/// Collect the response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is JSON")
}

/// Collect the response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect has a location")
        .to_str()
        .expect("location is ASCII")
}
