//! Database tests for the search ledger.
//!
//! The ledger is append-only and every search request adds a row, so these
//! tests pin the ordering and aggregation behaviour the API surfaces:
//! - History is newest first
//! - Trending terms order by count, then alphabetically
//! - Terms compare exactly (case and whitespace sensitive)

#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use shutterfinch_core::{ExternalProvider, SearchTerm, UserId};
use shutterfinch_server::db::{SearchLogRepository, UserRepository};
use shutterfinch_server::identity::ExternalIdentity;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, external_id: &str) -> UserId {
    let user = UserRepository::new(pool)
        .create(&ExternalIdentity {
            provider: ExternalProvider::Google,
            external_id: external_id.to_string(),
            display_name: "Searcher".to_string(),
            photo: None,
        })
        .await
        .unwrap();
    user.id
}

fn term(s: &str) -> SearchTerm {
    SearchTerm::parse(s).unwrap()
}

async fn append_n(repo: &SearchLogRepository<'_>, user_id: UserId, s: &str, n: usize) {
    for _ in 0..n {
        repo.append(user_id, &term(s)).await.unwrap();
    }
}

// ---------------------------------------------------------------------------
// Test: Append is unconditional and keeps every row
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn append_returns_increasing_ids(pool: PgPool) {
    let user_id = create_user(&pool, "g-log-1").await;
    let repo = SearchLogRepository::new(&pool);

    let first = repo.append(user_id, &term("cats")).await.unwrap();
    let second = repo.append(user_id, &term("cats")).await.unwrap();

    assert!(second.as_inner() > first.as_inner());

    let history = repo.history(user_id).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn history_is_newest_first(pool: PgPool) {
    let user_id = create_user(&pool, "g-log-2").await;
    let repo = SearchLogRepository::new(&pool);

    repo.append(user_id, &term("first")).await.unwrap();
    repo.append(user_id, &term("second")).await.unwrap();
    repo.append(user_id, &term("third")).await.unwrap();

    let history = repo.history(user_id).await.unwrap();
    let terms: Vec<&str> = history.iter().map(|e| e.term.as_str()).collect();
    assert_eq!(terms, vec!["third", "second", "first"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn history_is_scoped_to_the_user(pool: PgPool) {
    let alice = create_user(&pool, "g-log-3a").await;
    let bob = create_user(&pool, "g-log-3b").await;
    let repo = SearchLogRepository::new(&pool);

    repo.append(alice, &term("mountains")).await.unwrap();
    repo.append(bob, &term("ocean")).await.unwrap();

    let history = repo.history(alice).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history.first().unwrap().term, "mountains");
}

// ---------------------------------------------------------------------------
// Test: Trending term aggregation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn top_terms_order_by_count_then_term(pool: PgPool) {
    let user_id = create_user(&pool, "g-log-4").await;
    let repo = SearchLogRepository::new(&pool);

    append_n(&repo, user_id, "sunset", 3).await;
    append_n(&repo, user_id, "coffee", 2).await;
    // Equal counts break alphabetically.
    append_n(&repo, user_id, "beach", 2).await;
    append_n(&repo, user_id, "zebra", 1).await;

    let top = repo.top_terms(5).await.unwrap();
    let terms: Vec<(&str, i64)> = top.iter().map(|t| (t.term.as_str(), t.count)).collect();
    assert_eq!(
        terms,
        vec![("sunset", 3), ("beach", 2), ("coffee", 2), ("zebra", 1)]
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn top_terms_respects_the_limit(pool: PgPool) {
    let user_id = create_user(&pool, "g-log-5").await;
    let repo = SearchLogRepository::new(&pool);

    for s in ["a", "b", "c", "d"] {
        repo.append(user_id, &term(s)).await.unwrap();
    }

    let top = repo.top_terms(2).await.unwrap();
    assert_eq!(top.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn top_terms_aggregate_across_users(pool: PgPool) {
    let alice = create_user(&pool, "g-log-6a").await;
    let bob = create_user(&pool, "g-log-6b").await;
    let repo = SearchLogRepository::new(&pool);

    repo.append(alice, &term("forest")).await.unwrap();
    repo.append(bob, &term("forest")).await.unwrap();

    let top = repo.top_terms(5).await.unwrap();
    assert_eq!(top.first().unwrap().term, "forest");
    assert_eq!(top.first().unwrap().count, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn terms_are_case_sensitive(pool: PgPool) {
    let user_id = create_user(&pool, "g-log-7").await;
    let repo = SearchLogRepository::new(&pool);

    repo.append(user_id, &term("Cat")).await.unwrap();
    repo.append(user_id, &term("cat")).await.unwrap();

    let top = repo.top_terms(5).await.unwrap();
    assert_eq!(top.len(), 2);
    assert!(top.iter().all(|t| t.count == 1));
}
