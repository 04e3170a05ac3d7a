//! OAuth route handlers.
//!
//! Handles the authorization-code flow for every identity provider:
//! - Login: Redirects to the provider's authorization page
//! - Callback: Validates state, exchanges the code, signs the user in
//! - Logout: Destroys the session
//! - Me: Returns the logged-in user's profile with their collections

use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;

use shutterfinch_core::{ExternalProvider, UserId};

use crate::db::{CollectionRepository, UserRepository};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{CurrentUser, ImageRecord, session_keys};
use crate::services::accounts;
use crate::state::AppState;

/// Query parameters from an OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// The logged-in user's profile, with both collections embedded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: UserId,
    pub provider: ExternalProvider,
    pub display_name: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub downloads: Vec<ImageRecord>,
    pub favourites: Vec<ImageRecord>,
}

/// Random alphanumeric string for the OAuth CSRF state.
fn generate_state(length: usize) -> String {
    rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Parse a provider path segment, rejecting unknown providers with 404.
fn parse_provider(segment: &str) -> Result<ExternalProvider, AppError> {
    segment.parse::<ExternalProvider>().map_err(AppError::NotFound)
}

/// Initiate OAuth login with a provider.
///
/// Generates a CSRF state parameter, stores it in the session, and redirects
/// to the provider's authorization page.
///
/// # Route
///
/// `GET /auth/{provider}`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<String>,
) -> Result<Response, AppError> {
    let provider = parse_provider(&provider)?;

    // Generate CSRF state
    let oauth_state = generate_state(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        let login_url = format!("{}/login?error=session", state.config().client_url);
        return Ok(Redirect::to(&login_url).into_response());
    }

    // Build the redirect URI
    let redirect_uri = format!("{}/auth/{provider}/callback", state.config().base_url);

    // Generate and redirect to authorization URL
    let auth_url = state
        .identity()
        .authorization_url(provider, &redirect_uri, &oauth_state)?;

    Ok(Redirect::to(auth_url.as_str()).into_response())
}

/// Handle an OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code, finds or
/// creates the account, and stores the user in the session.
///
/// # Route
///
/// `GET /auth/{provider}/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Path(provider): Path<String>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, AppError> {
    let provider = parse_provider(&provider)?;
    let client_login = format!("{}/login", state.config().client_url);

    // Check for OAuth errors from the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error from {}: {} - {}", provider, error, description);
        return Ok(Redirect::to(&format!("{client_login}?error=denied")).into_response());
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("OAuth callback from {} missing code", provider);
        return Ok(Redirect::to(&format!("{client_login}?error=missing_code")).into_response());
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("OAuth callback from {} missing state", provider);
        return Ok(Redirect::to(&format!("{client_login}?error=missing_state")).into_response());
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch for {}", provider);
        return Ok(Redirect::to(&format!("{client_login}?error=invalid_state")).into_response());
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;

    // Build redirect URI (must match the one used in authorization request)
    let redirect_uri = format!("{}/auth/{provider}/callback", state.config().base_url);

    // Exchange code for the user's identity
    let identity = match state.identity().resolve(provider, &code, &redirect_uri).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::error!("Failed to resolve {} identity: {}", provider, e);
            return Ok(
                Redirect::to(&format!("{client_login}?error=token_exchange")).into_response(),
            );
        }
    };

    let user = accounts::find_or_create(state.pool(), &identity).await?;

    let current = CurrentUser {
        id: user.id,
        display_name: user.display_name.clone(),
    };

    if let Err(e) = set_current_user(&session, &current).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Ok(Redirect::to(&format!("{client_login}?error=session")).into_response());
    }

    set_sentry_user(&user.id, Some(&user.display_name));

    tracing::info!(user_id = %user.id, provider = %provider, "user authenticated");

    Ok(Redirect::to(&state.config().client_url).into_response())
}

/// Return the logged-in user's profile with their collections.
///
/// # Route
///
/// `GET /auth/me`
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = UserRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

    let collections = CollectionRepository::new(state.pool());
    let downloads = collections.downloads(user.id).await?;
    let favourites = collections.favourites(user.id).await?;

    Ok(Json(ProfileResponse {
        id: user.id,
        provider: user.provider,
        display_name: user.display_name,
        photo: user.photo,
        created_at: user.created_at,
        downloads,
        favourites,
    }))
}

/// Log the user out by destroying the session.
///
/// # Route
///
/// `POST /auth/logout` (also aliased as `GET /logout`)
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>, AppError> {
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to destroy session: {e}")))?;

    clear_sentry_user();

    Ok(Json(json!({ "status": "logged out" })))
}
