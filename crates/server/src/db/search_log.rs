//! Search ledger repository.
//!
//! The ledger is append-only: every search request adds a row, including
//! repeat pages of the same term, and rows are never updated or deleted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shutterfinch_core::{SearchEventId, SearchTerm, UserId};

use super::RepositoryError;

/// One row of the search ledger.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SearchEvent {
    pub id: SearchEventId,
    pub user_id: UserId,
    pub term: String,
    pub created_at: DateTime<Utc>,
}

/// A term with its site-wide search count.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TermCount {
    pub term: String,
    pub count: i64,
}

/// Repository for the search ledger.
pub struct SearchLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SearchLogRepository<'a> {
    /// Create a new search log repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Append a search event to the ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn append(
        &self,
        user_id: UserId,
        term: &SearchTerm,
    ) -> Result<SearchEventId, RepositoryError> {
        let (id,): (SearchEventId,) =
            sqlx::query_as("INSERT INTO search_events (user_id, term) VALUES ($1, $2) RETURNING id")
                .bind(user_id)
                .bind(term.as_str())
                .fetch_one(self.pool)
                .await?;

        Ok(id)
    }

    /// A user's search history, newest first.
    ///
    /// Ties on `created_at` break by insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn history(&self, user_id: UserId) -> Result<Vec<SearchEvent>, RepositoryError> {
        let events = sqlx::query_as::<_, SearchEvent>(
            "SELECT id, user_id, term, created_at FROM search_events \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    /// Site-wide most-searched terms, most frequent first.
    ///
    /// Terms compare exactly: case and inner whitespace distinguish them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn top_terms(&self, limit: i64) -> Result<Vec<TermCount>, RepositoryError> {
        let terms = sqlx::query_as::<_, TermCount>(
            "SELECT term, COUNT(*) AS count FROM search_events \
             GROUP BY term \
             ORDER BY count DESC, term ASC \
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(terms)
    }
}
