//! External identity provider enum.

use serde::{Deserialize, Serialize};

/// An external OAuth identity provider.
///
/// Each user account is keyed by exactly one provider plus that provider's
/// external subject ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExternalProvider {
    Google,
    Facebook,
    Github,
}

impl ExternalProvider {
    /// All supported providers, in route-registration order.
    pub const ALL: [Self; 3] = [Self::Google, Self::Facebook, Self::Github];

    /// The provider's lowercase path segment, as used in `/auth/{provider}`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Facebook => "facebook",
            Self::Github => "github",
        }
    }
}

impl std::fmt::Display for ExternalProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ExternalProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Self::Google),
            "facebook" => Ok(Self::Facebook),
            "github" => Ok(Self::Github),
            _ => Err(format!("unknown identity provider: {s}")),
        }
    }
}
