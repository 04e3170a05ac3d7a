//! Catalog API response types.
//!
//! Deserialized from the catalog's snake_case JSON and re-serialized as
//! camelCase for clients.

use serde::{Deserialize, Serialize};

/// One page of catalog search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct CatalogPage {
    /// Total matching images across all pages.
    pub total: i64,
    /// Total pages at the requested page size.
    pub total_pages: i64,
    pub results: Vec<ImageCandidate>,
}

/// A single catalog image in a result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct ImageCandidate {
    /// Catalog-assigned image ID.
    pub id: String,
    pub urls: CandidateUrls,
    #[serde(default)]
    pub description: Option<String>,
    /// Fallback description generated by the catalog.
    #[serde(default)]
    pub alt_description: Option<String>,
}

/// Image URLs at the sizes the catalog renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase", deserialize = "snake_case"))]
pub struct CandidateUrls {
    pub full: String,
    pub regular: String,
    pub small: String,
    pub thumb: String,
}
