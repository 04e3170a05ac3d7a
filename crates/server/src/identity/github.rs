//! GitHub OAuth provider.

use secrecy::ExposeSecret;
use serde::Deserialize;
use shutterfinch_core::ExternalProvider;
use tracing::instrument;
use url::Url;

use super::{ExternalIdentity, IdentityError};
use crate::config::ProviderKeys;

const AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";

// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("shutterfinch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubUser {
    id: i64,
    login: String,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// Client for GitHub's OAuth endpoints.
#[derive(Clone)]
pub struct GithubProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl GithubProvider {
    #[must_use]
    pub fn new(keys: &ProviderKeys, client: reqwest::Client) -> Self {
        Self {
            client,
            client_id: keys.client_id.clone(),
            client_secret: keys.client_secret.expose_secret().to_string(),
        }
    }

    /// The GitHub authorization URL for this sign-in attempt.
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
                ("state", state),
                ("scope", "user:email"),
            ],
        )?;
        Ok(url)
    }

    /// Exchange the authorization code and fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenExchange` if GitHub rejects the code, and
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
            // GitHub defaults to form-encoded responses without this
            .header("Accept", "application/json")
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
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

        let user: GithubUser = self
            .client
            .get(USER_URL)
            .bearer_auth(&access_token)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .json()
            .await?;

        Ok(ExternalIdentity {
            provider: ExternalProvider::Github,
            external_id: user.id.to_string(),
            display_name: user.name.unwrap_or(user.login),
            photo: user.avatar_url,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_authorization_url() {
        let provider = GithubProvider::new(
            &ProviderKeys {
                client_id: "gh-client".to_string(),
                client_secret: SecretString::from("gh-secret-value"),
            },
            reqwest::Client::new(),
        );

        let url = provider
            .authorization_url("http://localhost:5000/auth/github/callback", "state123")
            .unwrap();

        assert_eq!(url.host_str(), Some("github.com"));
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("scope".to_string(), "user:email".to_string())));
    }

    #[test]
    fn test_user_falls_back_to_login() {
        let json = r#"{
            "id": 583231,
            "login": "octocat",
            "name": null,
            "avatar_url": "https://avatars.example/583231"
        }"#;

        let user: GithubUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.name.unwrap_or(user.login), "octocat");
    }
}
