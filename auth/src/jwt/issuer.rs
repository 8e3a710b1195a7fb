use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Access;
use super::claims::Claims;
use super::claims::Family;
use super::claims::Refresh;
use super::claims::TokenClaims;
use super::claims::TokenFamily;
use super::errors::TokenError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::AuthConfig;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedToken<F: Family> {
    token: String,
    claims: TokenClaims<F>,
}

impl<F: Family> SignedToken<F> {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    pub fn claims(&self) -> &TokenClaims<F> {
        &self.claims
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

/// Issues access and refresh tokens.
///
/// Each family has its own handler, secret and TTL. The issuer holds no
/// mutable state; all of its operations can run concurrently.
pub struct TokenIssuer {
    access: JwtHandler,
    access_ttl_seconds: i64,
    refresh: JwtHandler,
    refresh_ttl_seconds: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer that stamps tokens with wall-clock time.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access: JwtHandler::new(config.access.secret.as_bytes()),
            access_ttl_seconds: config.access.ttl_seconds,
            refresh: JwtHandler::new(config.refresh.secret.as_bytes()),
            refresh_ttl_seconds: config.refresh.ttl_seconds,
            clock,
        }
    }

    /// Issue an access token for `principal`, valid from now for the access TTL.
    ///
    /// # Errors
    /// * `Configuration` - The access secret is empty or the access TTL is unusable
    pub fn issue_access_token(&self, principal: &str) -> Result<SignedToken<Access>, TokenError> {
        self.issue_access_token_at(principal, self.clock.now())
    }

    pub fn issue_access_token_at(
        &self,
        principal: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<Access>, TokenError> {
        self.issue(principal, now)
    }

    /// Issue a refresh token for `principal`, valid from now for the refresh TTL.
    ///
    /// # Errors
    /// * `Configuration` - The refresh secret is empty or the refresh TTL is unusable
    pub fn issue_refresh_token(
        &self,
        principal: &str,
    ) -> Result<SignedToken<Refresh>, TokenError> {
        self.issue_refresh_token_at(principal, self.clock.now())
    }

    pub fn issue_refresh_token_at(
        &self,
        principal: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<Refresh>, TokenError> {
        self.issue(principal, now)
    }

    fn issue<F: Family>(
        &self,
        principal: &str,
        now: DateTime<Utc>,
    ) -> Result<SignedToken<F>, TokenError> {
        if principal.is_empty() {
            return Err(TokenError::EncodingFailed(
                "principal identifier is empty".to_string(),
            ));
        }

        let (handler, ttl_seconds) = match F::FAMILY {
            TokenFamily::Access => (&self.access, self.access_ttl_seconds),
            TokenFamily::Refresh => (&self.refresh, self.refresh_ttl_seconds),
        };

        let token = Self::ttl(ttl_seconds)
            .and_then(|ttl| {
                Claims::for_principal(principal, now, ttl).ok_or_else(|| {
                    TokenError::Configuration(format!(
                        "expiry {}s after {} is out of range",
                        ttl_seconds, now
                    ))
                })
            })
            .and_then(|wire| handler.encode(&wire).map(|token| (token, wire)));
        let (token, wire) = token.map_err(|e| {
            tracing::error!(family = %F::FAMILY, error = %e, "Failed to sign token");
            e
        })?;
        let claims = TokenClaims::from_wire(wire)?;

        tracing::debug!(
            family = %F::FAMILY,
            principal = %principal,
            expires_at = %claims.expires_at(),
            "Token issued"
        );

        Ok(SignedToken { token, claims })
    }

    /// Expiry must land strictly after issuance.
    fn ttl(ttl_seconds: i64) -> Result<Duration, TokenError> {
        if ttl_seconds <= 0 {
            return Err(TokenError::Configuration(format!(
                "token TTL must be positive, got {}s",
                ttl_seconds
            )));
        }

        Duration::try_seconds(ttl_seconds).ok_or_else(|| {
            TokenError::Configuration(format!("token TTL {}s is out of range", ttl_seconds))
        })
    }
}
