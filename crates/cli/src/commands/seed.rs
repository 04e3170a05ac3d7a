//! Seed the database with demo data.
//!
//! Creates a demo user (safe to run repeatedly, the user is looked up by its
//! fixed external identity) and appends a weighted batch of search events so
//! the trending-terms endpoint has something to report on a fresh database.
//!
//! # Usage
//!
//! ```bash
//! sf-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `SERVER_DATABASE_URL` - `PostgreSQL` connection string
//! - `DATABASE_URL` - Fallback connection string

use secrecy::SecretString;
use thiserror::Error;
use tracing::info;

use shutterfinch_core::{ExternalProvider, SearchTerm};
use shutterfinch_server::db::{RepositoryError, SearchLogRepository};
use shutterfinch_server::identity::ExternalIdentity;
use shutterfinch_server::services::accounts;

/// Search terms inserted by the seeder, with per-term repeat counts.
///
/// Uneven counts give the trending-terms query a stable, non-trivial ordering.
const SAMPLE_TERMS: &[(&str, usize)] = &[
    ("mountains", 5),
    ("coffee", 4),
    ("sunset", 3),
    ("architecture", 2),
    ("forest", 2),
    ("cats", 1),
    ("ocean", 1),
];

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Repository operation error.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// A sample term failed validation.
    #[error("Invalid sample term: {0}")]
    InvalidTerm(String),
}

/// Create the demo user and append sample search events.
///
/// # Errors
///
/// Returns an error if no database URL is configured or any database
/// operation fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SERVER_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("SERVER_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = shutterfinch_server::db::create_pool(&database_url).await?;

    let identity = ExternalIdentity {
        provider: ExternalProvider::Github,
        external_id: "shutterfinch-demo".to_owned(),
        display_name: "Demo User".to_owned(),
        photo: None,
    };

    let user = accounts::find_or_create(&pool, &identity).await?;
    info!(user_id = %user.id, "Demo user ready");

    let search_log = SearchLogRepository::new(&pool);
    let mut inserted = 0usize;

    for (raw, count) in SAMPLE_TERMS {
        let term =
            SearchTerm::parse(raw).map_err(|e| SeedError::InvalidTerm(format!("{raw}: {e}")))?;

        for _ in 0..*count {
            search_log.append(user.id, &term).await?;
            inserted += 1;
        }
    }

    info!("Seeding complete!");
    info!("  Demo user id: {}", user.id);
    info!("  Search events inserted: {inserted}");

    Ok(())
}
