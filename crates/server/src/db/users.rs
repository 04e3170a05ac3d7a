//! User repository for database operations.
//!
//! Queries run at runtime via `query_as` so the crate builds without a live
//! database connection.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shutterfinch_core::{ExternalProvider, UserId};

use super::RepositoryError;
use crate::identity::ExternalIdentity;
use crate::models::User;

/// The `users` column holding the given provider's subject ID.
const fn id_column(provider: ExternalProvider) -> &'static str {
    match provider {
        ExternalProvider::Google => "google_id",
        ExternalProvider::Facebook => "facebook_id",
        ExternalProvider::Github => "github_id",
    }
}

/// Raw `users` row, before provider resolution.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    google_id: Option<String>,
    facebook_id: Option<String>,
    github_id: Option<String>,
    display_name: String,
    photo: Option<String>,
    created_at: DateTime<Utc>,
}

impl UserRow {
    /// Resolve which provider column is populated.
    ///
    /// The table CHECK constraint guarantees exactly one; a row violating it
    /// is corrupt.
    fn into_user(self) -> Result<User, RepositoryError> {
        let (provider, external_id) = if let Some(id) = self.google_id {
            (ExternalProvider::Google, id)
        } else if let Some(id) = self.facebook_id {
            (ExternalProvider::Facebook, id)
        } else if let Some(id) = self.github_id {
            (ExternalProvider::Github, id)
        } else {
            return Err(RepositoryError::DataCorruption(format!(
                "user {} has no provider id",
                self.id
            )));
        };

        Ok(User {
            id: UserId::new(self.id),
            provider,
            external_id,
            display_name: self.display_name,
            photo: self.photo,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, google_id, facebook_id, github_id, display_name, photo, created_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by provider and external subject ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row has no provider ID.
    pub async fn find_by_external(
        &self,
        provider: ExternalProvider,
        external_id: &str,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {} = $1",
            id_column(provider)
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(external_id)
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the row has no provider ID.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_inner())
            .fetch_optional(self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user from a resolved external identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the external identity is already
    /// registered.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, identity: &ExternalIdentity) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users ({}, display_name, photo) VALUES ($1, $2, $3) \
             RETURNING {USER_COLUMNS}",
            id_column(identity.provider)
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&identity.external_id)
            .bind(&identity.display_name)
            .bind(&identity.photo)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    return RepositoryError::Conflict("identity already registered".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        row.into_user()
    }
}
