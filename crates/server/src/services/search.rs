//! Catalog search with ledger recording.

use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use shutterfinch_core::{SearchTerm, UserId};

use crate::catalog::{CatalogClient, CatalogError, ImageCandidate};
use crate::db::{RepositoryError, SearchLogRepository};
use crate::error::AppError;

/// Fixed page size for catalog searches.
pub const RESULTS_PER_PAGE: i64 = 16;

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Repository(e) => Self::Database(e),
            SearchError::Catalog(e) => Self::Catalog(e),
        }
    }
}

/// One page of search results, as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub term: String,
    pub page: i64,
    /// Total matching images across all pages.
    pub total: i64,
    pub total_pages: i64,
    pub results: Vec<ImageCandidate>,
}

/// Search the catalog and record the request in the search ledger.
///
/// The ledger row is written before the catalog call, so every request the
/// user makes is recorded, including repeat pages of the same term and
/// searches the catalog later fails to serve.
///
/// # Errors
///
/// Returns `SearchError::Repository` if the ledger insert fails and
/// `SearchError::Catalog` if the catalog call fails.
pub async fn search(
    pool: &PgPool,
    catalog: &CatalogClient,
    user_id: UserId,
    term: &SearchTerm,
    page: i64,
) -> Result<SearchResults, SearchError> {
    SearchLogRepository::new(pool).append(user_id, term).await?;

    let catalog_page = catalog.search(term, page, RESULTS_PER_PAGE).await?;

    Ok(SearchResults {
        term: term.as_str().to_string(),
        page,
        total: catalog_page.total,
        total_pages: catalog_page.total_pages,
        results: catalog_page.results,
    })
}
