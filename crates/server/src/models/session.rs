//! Session-stored user identity.

use serde::{Deserialize, Serialize};
use shutterfinch_core::UserId;

/// Session keys used by the auth flow.
pub mod session_keys {
    /// The logged-in user, set after a successful OAuth callback.
    pub const CURRENT_USER: &str = "current_user";
    /// One-time CSRF state for an in-flight OAuth authorization.
    pub const OAUTH_STATE: &str = "oauth_state";
}

/// The authenticated user stored in the session.
///
/// Only the ID and display name live in the session; everything else is
/// loaded from the database per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub display_name: String,
}
