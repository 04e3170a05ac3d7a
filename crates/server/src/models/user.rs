//! User account model.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shutterfinch_core::{ExternalProvider, UserId};

/// A user account, keyed by one external OAuth identity.
///
/// Accounts are never merged across providers: signing in with Google and
/// with GitHub using the same email produces two distinct users.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    /// The provider this account is bound to.
    pub provider: ExternalProvider,
    /// The provider's stable subject ID for this user.
    pub external_id: String,
    pub display_name: String,
    /// Profile photo URL, when the provider supplies one.
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
}
