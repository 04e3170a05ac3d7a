//! Download ledger route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::CollectionRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{ImageRecord, ImageSubmission};
use crate::state::AppState;

/// Request body for recording a batch of downloads.
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub images: Vec<ImageSubmission>,
}

/// A user's full download history.
#[derive(Debug, Serialize)]
pub struct DownloadsResponse {
    pub downloads: Vec<ImageRecord>,
}

/// Record a batch of downloaded images.
///
/// Duplicates are kept; re-downloading an image appends a new row. Responds
/// with the full updated history.
///
/// # Route
///
/// `POST /api/downloads`
pub async fn record(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<DownloadRequest>,
) -> Result<Json<DownloadsResponse>, AppError> {
    if request.images.is_empty() {
        return Err(AppError::BadRequest("No images provided".to_string()));
    }

    let repo = CollectionRepository::new(state.pool());
    repo.add_downloads(user.id, &request.images).await?;
    let downloads = repo.downloads(user.id).await?;

    Ok(Json(DownloadsResponse { downloads }))
}

/// The logged-in user's download history, oldest first.
///
/// # Route
///
/// `GET /api/downloads`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<DownloadsResponse>, AppError> {
    let downloads = CollectionRepository::new(state.pool())
        .downloads(user.id)
        .await?;

    Ok(Json(DownloadsResponse { downloads }))
}
