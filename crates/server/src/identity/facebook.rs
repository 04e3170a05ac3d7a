//! Facebook OAuth provider.

use secrecy::ExposeSecret;
use serde::Deserialize;
use shutterfinch_core::ExternalProvider;
use tracing::instrument;
use url::Url;

use super::{ExternalIdentity, IdentityError};
use crate::config::ProviderKeys;

const AUTHORIZE_URL: &str = "https://www.facebook.com/v19.0/dialog/oauth";
const TOKEN_URL: &str = "https://graph.facebook.com/v19.0/oauth/access_token";
const PROFILE_URL: &str = "https://graph.facebook.com/me";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Profile {
    id: String,
    name: String,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    data: PictureData,
}

#[derive(Debug, Deserialize)]
struct PictureData {
    url: String,
}

/// Client for Facebook's Graph API OAuth endpoints.
#[derive(Clone)]
pub struct FacebookProvider {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
}

impl FacebookProvider {
    #[must_use]
    pub fn new(keys: &ProviderKeys, client: reqwest::Client) -> Self {
        Self {
            client,
            client_id: keys.client_id.clone(),
            client_secret: keys.client_secret.expose_secret().to_string(),
        }
    }

    /// The Facebook login dialog URL for this sign-in attempt.
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
                ("scope", "public_profile"),
                // Re-prompt for credentials so shared machines can switch accounts
                ("auth_type", "reauthenticate"),
            ],
        )?;
        Ok(url)
    }

    /// Exchange the authorization code and fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::TokenExchange` if Facebook rejects the code,
    /// and `IdentityError::Http` on transport failures.
    #[instrument(skip(self, code))]
    pub async fn resolve(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExternalIdentity, IdentityError> {
        let token: TokenResponse = self
            .client
            .get(TOKEN_URL)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", redirect_uri),
                ("code", code),
            ])
            .send()
            .await?
            .json()
            .await?;

        let access_token = token.access_token.ok_or_else(|| {
            IdentityError::TokenExchange("no access token in response".to_string())
        })?;

        let profile: Profile = self
            .client
            .get(PROFILE_URL)
            .query(&[
                ("fields", "id,name,picture"),
                ("access_token", access_token.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(ExternalIdentity {
            provider: ExternalProvider::Facebook,
            external_id: profile.id,
            display_name: profile.name,
            photo: profile.picture.map(|p| p.data.url),
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
        let provider = FacebookProvider::new(
            &ProviderKeys {
                client_id: "fb-client".to_string(),
                client_secret: SecretString::from("fb-secret-value"),
            },
            reqwest::Client::new(),
        );

        let url = provider
            .authorization_url("http://localhost:5000/auth/facebook/callback", "state123")
            .unwrap();

        assert_eq!(url.host_str(), Some("www.facebook.com"));
        let query: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(query.contains(&("scope".to_string(), "public_profile".to_string())));
        assert!(query.contains(&("auth_type".to_string(), "reauthenticate".to_string())));
    }

    #[test]
    fn test_profile_picture_shape() {
        let json = r#"{
            "id": "10158",
            "name": "Pat Example",
            "picture": { "data": { "url": "https://graph.example/photo.jpg" } }
        }"#;

        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(
            profile.picture.unwrap().data.url,
            "https://graph.example/photo.jpg"
        );
    }
}
