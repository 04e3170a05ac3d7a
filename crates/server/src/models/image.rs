//! Image collection entry models (downloads and favourites).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored collection entry, as returned to clients.
///
/// Rows from `user_downloads` and `user_favourites` share this shape.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Full-size image URL.
    pub url: String,
    /// Thumbnail URL.
    pub thumb: String,
    /// The search term that surfaced this image, if known.
    pub query: Option<String>,
    pub description: Option<String>,
    /// Catalog-assigned image ID. Always present on favourites.
    pub external_image_id: Option<String>,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A client-submitted image, before it is written to a collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSubmission {
    pub url: String,
    pub thumb: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub external_image_id: Option<String>,
}
