//! Image collection repositories: the download ledger and the favourites set.

use sqlx::PgPool;

use shutterfinch_core::UserId;

use super::RepositoryError;
use crate::models::{ImageRecord, ImageSubmission};

const RECORD_COLUMNS: &str = "url, thumb, query, description, external_image_id, created_at";

/// Repository for a user's image collections.
pub struct CollectionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CollectionRepository<'a> {
    /// Create a new collection repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Downloads
    // =========================================================================

    /// Record a batch of downloads in submission order.
    ///
    /// Duplicates are kept: downloading the same image twice records two rows.
    /// The batch is written in a single transaction, so it lands entirely or
    /// not at all.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails.
    pub async fn add_downloads(
        &self,
        user_id: UserId,
        images: &[ImageSubmission],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for image in images {
            sqlx::query(
                "INSERT INTO user_downloads \
                 (user_id, url, thumb, query, description, external_image_id) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(user_id)
            .bind(&image.url)
            .bind(&image.thumb)
            .bind(&image.query)
            .bind(&image.description)
            .bind(&image.external_image_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }

    /// A user's download history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn downloads(&self, user_id: UserId) -> Result<Vec<ImageRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM user_downloads WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    // =========================================================================
    // Favourites
    // =========================================================================

    /// Add an image to a user's favourites.
    ///
    /// Idempotent: adding an image that is already a favourite is a no-op and
    /// the original row keeps its timestamp.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn add_favourite(
        &self,
        user_id: UserId,
        image: &ImageSubmission,
        external_image_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO user_favourites \
             (user_id, url, thumb, query, description, external_image_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, external_image_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(&image.url)
        .bind(&image.thumb)
        .bind(&image.query)
        .bind(&image.description)
        .bind(external_image_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove an image from a user's favourites.
    ///
    /// Idempotent: removing an image that is not a favourite is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn remove_favourite(
        &self,
        user_id: UserId,
        external_image_id: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM user_favourites WHERE user_id = $1 AND external_image_id = $2")
            .bind(user_id)
            .bind(external_image_id)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// A user's favourites, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn favourites(&self, user_id: UserId) -> Result<Vec<ImageRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {RECORD_COLUMNS} FROM user_favourites WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}
