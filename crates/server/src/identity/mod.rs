//! External identity provider clients.
//!
//! Implements the server-side half of the OAuth authorization-code flow for
//! each supported provider. Providers only ever hand back an
//! [`ExternalIdentity`]; account lookup and creation happen in the services
//! layer.

mod facebook;
mod github;
mod google;

pub use facebook::FacebookProvider;
pub use github::GithubProvider;
pub use google::GoogleProvider;

use shutterfinch_core::ExternalProvider;
use thiserror::Error;
use url::Url;

use crate::config::OauthConfig;

/// Errors that can occur during an OAuth exchange.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL construction failed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The provider rejected the code exchange.
    #[error("Token exchange failed: {0}")]
    TokenExchange(String),
}

/// A user identity as resolved from a provider's profile endpoint.
#[derive(Debug, Clone)]
pub struct ExternalIdentity {
    pub provider: ExternalProvider,
    /// The provider's stable subject ID.
    pub external_id: String,
    pub display_name: String,
    pub photo: Option<String>,
}

/// All configured identity providers, dispatched by [`ExternalProvider`].
#[derive(Clone)]
pub struct IdentityProviders {
    google: GoogleProvider,
    facebook: FacebookProvider,
    github: GithubProvider,
}

impl IdentityProviders {
    /// Build provider clients from OAuth configuration.
    ///
    /// All providers share one HTTP connection pool.
    #[must_use]
    pub fn new(config: &OauthConfig) -> Self {
        let client = reqwest::Client::new();
        Self {
            google: GoogleProvider::new(&config.google, client.clone()),
            facebook: FacebookProvider::new(&config.facebook, client.clone()),
            github: GithubProvider::new(&config.github, client),
        }
    }

    /// The URL to redirect the user to for authorization.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Url` if the authorization URL cannot be built.
    pub fn authorization_url(
        &self,
        provider: ExternalProvider,
        redirect_uri: &str,
        state: &str,
    ) -> Result<Url, IdentityError> {
        match provider {
            ExternalProvider::Google => self.google.authorization_url(redirect_uri, state),
            ExternalProvider::Facebook => self.facebook.authorization_url(redirect_uri, state),
            ExternalProvider::Github => self.github.authorization_url(redirect_uri, state),
        }
    }

    /// Exchange an authorization code and fetch the user's profile.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError` if the code exchange or profile fetch fails.
    pub async fn resolve(
        &self,
        provider: ExternalProvider,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ExternalIdentity, IdentityError> {
        match provider {
            ExternalProvider::Google => self.google.resolve(code, redirect_uri).await,
            ExternalProvider::Facebook => self.facebook.resolve(code, redirect_uri).await,
            ExternalProvider::Github => self.github.resolve(code, redirect_uri).await,
        }
    }
}
