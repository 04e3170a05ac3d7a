//! Google OAuth provider.

use secrecy::ExposeSecret;
use serde::Deserialize;
use shutterfinch_core::ExternalProvider;
use tracing::instrument;
use url::Url;

use super::{ExternalIdentity, IdentityError};
use crate::config::ProviderKeys;

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
    name: String,
    picture: Option<String>,
}

/// Client for Google's OAuth 2.0 endpoints.
#[derive(Clone)]
pub struct GoogleProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GoogleProvider {
    #[must_use]
    pub fn new(keys: &ProviderKeys, client: reqwest::Client) -> Self {
        Self {
            client,
            client_id: keys.client_id.clone(),
            client_secret: keys.client_secret.expose_secret().to_string(),
        }
    }

    /// The Google consent screen URL for this sign-in attempt.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Url` if the URL cannot be built.
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url, IdentityError> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", "openid profile email"),
                ("state", state),
                // Always show the account chooser, even with one session
                ("prompt", "select_account"),
            ],
        )?;
        Ok(url)
    }

    /// Exchange the authorization code and fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenExchange` if Google rejects the code, and
    /// `IdentityError::Http` on transport failures.
    #[instrument(skip(self, code))]
    pub async fn resolve(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExternalIdentity, IdentityError> {
        let token: TokenResponse = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?
            .json()
            .await?;

        let access_token = token.access_token.ok_or_else(|| {
            IdentityError::TokenExchange(
                token
                    .error_description
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )
        })?;

        let info: UserInfo = self
            .client
            .get(USERINFO_URL)
            .bearer_auth(&access_token)
            .send()
            .await?
            .json()
            .await?;

        Ok(ExternalIdentity {
            provider: ExternalProvider::Google,
            external_id: info.id,
            display_name: info.name,
            photo: info.picture,
        })
    }
}
