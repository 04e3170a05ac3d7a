//! Search route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use shutterfinch_core::SearchTerm;

use crate::db::SearchLogRepository;
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::RequireAuth;
use crate::services::search::{self, SearchResults};
use crate::state::AppState;

/// Number of terms returned by the trending endpoint.
const TOP_TERMS_LIMIT: i64 = 5;

/// Request body for a catalog search.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub term: Option<String>,
    pub page: Option<i64>,
}

/// A trending term with its site-wide count.
#[derive(Debug, Serialize)]
pub struct TopTerm {
    pub term: String,
    pub count: i64,
}

/// One entry of a user's search history.
#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub term: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Search the image catalog.
///
/// Records the request in the search ledger before calling the catalog, so
/// every page request is logged even when the catalog fails.
///
/// # Route
///
/// `POST /api/search`
pub async fn search(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResults>, AppError> {
    let term = request
        .term
        .ok_or_else(|| AppError::BadRequest("Missing term".to_string()))?;
    let term = SearchTerm::parse(&term).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let page = request.page.unwrap_or(1);
    if page < 1 {
        return Err(AppError::BadRequest("Invalid page".to_string()));
    }

    add_breadcrumb("search", "Searched the catalog", Some(&[("term", term.as_str())]));

    let results = search::search(state.pool(), state.catalog(), user.id, &term, page).await?;

    Ok(Json(results))
}

/// The site-wide most-searched terms.
///
/// Intentionally unauthenticated: the client shows trending terms on the
/// login page.
///
/// # Route
///
/// `GET /api/top-searches`
pub async fn top_searches(State(state): State<AppState>) -> Result<Json<Vec<TopTerm>>, AppError> {
    let terms = SearchLogRepository::new(state.pool())
        .top_terms(TOP_TERMS_LIMIT)
        .await?;

    Ok(Json(
        terms
            .into_iter()
            .map(|t| TopTerm {
                term: t.term,
                count: t.count,
            })
            .collect(),
    ))
}

/// The logged-in user's search history, newest first.
///
/// # Route
///
/// `GET /api/history`
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let events = SearchLogRepository::new(state.pool()).history(user.id).await?;

    Ok(Json(
        events
            .into_iter()
            .map(|e| HistoryEntry {
                term: e.term,
                timestamp: e.created_at,
            })
            .collect(),
    ))
}
