use std::fmt;
use std::marker::PhantomData;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// The two token families. Each is signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenFamily {
    Access,
    Refresh,
}

impl fmt::Display for TokenFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenFamily::Access => f.write_str("access"),
            TokenFamily::Refresh => f.write_str("refresh"),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Type-level marker for a token family.
pub trait Family:
    sealed::Sealed + fmt::Debug + Clone + Copy + PartialEq + Eq + Send + Sync + 'static
{
    const FAMILY: TokenFamily;
}

/// Marker for access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {}

/// Marker for refresh tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {}

impl sealed::Sealed for Access {}
impl sealed::Sealed for Refresh {}

impl Family for Access {
    const FAMILY: TokenFamily = TokenFamily::Access;
}

impl Family for Refresh {
    const FAMILY: TokenFamily = TokenFamily::Refresh;
}

/// Wire-level JWT payload.
///
/// `sub` stays optional here so that a token missing its subject decodes and
/// can be rejected as malformed instead of surfacing as a parse error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (principal identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Create claims for a principal issued at `now` and valid for `ttl`.
    ///
    /// Returns `None` when `now + ttl` is not representable.
    pub fn for_principal(
        principal: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expiration = now.checked_add_signed(ttl)?;

        Some(Self {
            sub: Some(principal.to_string()),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Verified claims of one token family.
///
/// Only produced by the issuer or by a validator that has checked the
/// signature and expiry, so `AccessClaims` and `RefreshClaims` cannot be
/// confused at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims<F: Family> {
    subject: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    family: PhantomData<F>,
}

pub type AccessClaims = TokenClaims<Access>;
pub type RefreshClaims = TokenClaims<Refresh>;

impl<F: Family> TokenClaims<F> {
    pub(crate) fn new(subject: String, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            subject,
            issued_at,
            expires_at,
            family: PhantomData,
        }
    }

    /// Build typed claims from a decoded payload.
    ///
    /// # Errors
    /// * `MalformedToken` - the subject is absent/empty or a timestamp is out of range
    pub(crate) fn from_wire(claims: Claims) -> Result<Self, TokenError> {
        let subject = claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or_else(|| TokenError::MalformedToken("missing subject claim".to_string()))?;

        let issued_at = DateTime::from_timestamp(claims.iat, 0)
            .ok_or_else(|| TokenError::MalformedToken("iat out of range".to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| TokenError::MalformedToken("exp out of range".to_string()))?;

        Ok(Self::new(subject, issued_at, expires_at))
    }

    /// Principal identifier the token was issued for.
    pub fn principal(&self) -> &str {
        &self.subject
    }

    pub fn into_principal(self) -> String {
        self.subject
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn family(&self) -> TokenFamily {
        F::FAMILY
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiration instant and expired
    /// any time after it, including fractions of a second.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
