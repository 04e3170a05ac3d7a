//! Favourites route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::CollectionRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{ImageRecord, ImageSubmission};
use crate::state::AppState;

/// Whether to add or remove the favourite.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavouriteAction {
    Add,
    Remove,
}

/// Request body for toggling a favourite.
#[derive(Debug, Deserialize)]
pub struct FavouriteRequest {
    pub image: ImageSubmission,
    pub action: FavouriteAction,
}

/// A user's full favourites collection.
#[derive(Debug, Serialize)]
pub struct FavouritesResponse {
    pub favourites: Vec<ImageRecord>,
}

/// Add or remove a favourite.
///
/// Both directions are idempotent: re-adding keeps the original row and its
/// position, removing an absent favourite is a no-op. Responds with the full
/// updated collection either way.
///
/// # Route
///
/// `POST /api/favourites`
pub async fn toggle(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<FavouriteRequest>,
) -> Result<Json<FavouritesResponse>, AppError> {
    let external_image_id = request
        .image
        .external_image_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Invalid image".to_string()))?;

    let repo = CollectionRepository::new(state.pool());

    match request.action {
        FavouriteAction::Add => {
            repo.add_favourite(user.id, &request.image, external_image_id)
                .await?;
        }
        FavouriteAction::Remove => {
            repo.remove_favourite(user.id, external_image_id).await?;
        }
    }

    let favourites = repo.favourites(user.id).await?;

    Ok(Json(FavouritesResponse { favourites }))
}

/// The logged-in user's favourites, oldest first.
///
/// # Route
///
/// `GET /api/favourites`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<FavouritesResponse>, AppError> {
    let favourites = CollectionRepository::new(state.pool())
        .favourites(user.id)
        .await?;

    Ok(Json(FavouritesResponse { favourites }))
}
