//! Search term type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SearchTerm`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SearchTermError {
    /// The input string is empty or whitespace-only.
    #[error("search term cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("search term must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
}

/// A validated search term.
///
/// Every search operation and every row of the search ledger carries one of
/// these, so the non-empty guarantee is established once at the boundary and
/// holds everywhere downstream.
///
/// ## Constraints
///
/// - Non-empty after trimming leading/trailing whitespace
/// - At most 256 characters after trimming
/// - Inner whitespace and case are preserved exactly as entered; `"Cat"` and
///   `"cat"` are distinct terms for aggregation purposes
///
/// ## Examples
///
/// ```
/// use shutterfinch_core::SearchTerm;
///
/// assert!(SearchTerm::parse("mountain lake").is_ok());
/// assert_eq!(SearchTerm::parse("  sunset  ").unwrap().as_str(), "sunset");
///
/// assert!(SearchTerm::parse("").is_err());
/// assert!(SearchTerm::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SearchTerm(String);

impl SearchTerm {
    /// Maximum length of a search term.
    pub const MAX_LENGTH: usize = 256;

    /// Parse a `SearchTerm` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty (or whitespace-only) or longer
    /// than 256 characters after trimming.
    pub fn parse(s: &str) -> Result<Self, SearchTermError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(SearchTermError::Empty);
        }

        if trimmed.len() > Self::MAX_LENGTH {
            return Err(SearchTermError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the term as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SearchTerm` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SearchTerm {
    type Err = SearchTermError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SearchTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for SearchTerm {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SearchTerm {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for SearchTerm {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
