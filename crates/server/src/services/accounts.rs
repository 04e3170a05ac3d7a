//! Account lookup and provisioning.

use sqlx::PgPool;
use tracing::info;

use crate::db::{RepositoryError, UserRepository};
use crate::identity::ExternalIdentity;
use crate::models::User;

/// Find the account for a resolved external identity, creating it on first
/// sign-in.
///
/// Two concurrent first sign-ins can both miss the lookup; the loser of the
/// insert race re-reads the winner's row.
///
/// # Errors
///
/// Returns `RepositoryError` if any database operation fails.
pub async fn find_or_create(
    pool: &PgPool,
    identity: &ExternalIdentity,
) -> Result<User, RepositoryError> {
    let repo = UserRepository::new(pool);

    if let Some(user) = repo
        .find_by_external(identity.provider, &identity.external_id)
        .await?
    {
        return Ok(user);
    }

    match repo.create(identity).await {
        Ok(user) => {
            info!(
                user_id = %user.id,
                provider = %user.provider,
                "created new user account"
            );
            Ok(user)
        }
        Err(RepositoryError::Conflict(_)) => repo
            .find_by_external(identity.provider, &identity.external_id)
            .await?
            .ok_or(RepositoryError::NotFound),
        Err(e) => Err(e),
    }
}
