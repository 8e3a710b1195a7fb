use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use super::claims::AccessClaims;
use super::claims::Claims;
use super::claims::Family;
use super::claims::RefreshClaims;
use super::claims::TokenClaims;
use super::claims::TokenFamily;
use super::errors::TokenError;
use super::handler::JwtHandler;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::AuthConfig;

/// Verifies access and refresh tokens.
///
/// Checks run in order: structure, signature under the family's own secret,
/// subject presence, then expiry against the clock. A token signed for one
/// family always fails the other family's signature check.
pub struct TokenValidator {
    access: JwtHandler,
    refresh: JwtHandler,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    /// Create a validator that judges expiry against wall-clock time.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access: JwtHandler::new(config.access.secret.as_bytes()),
            refresh: JwtHandler::new(config.refresh.secret.as_bytes()),
            clock,
        }
    }

    /// Validate an access token and return its claims.
    ///
    /// # Errors
    /// * `MalformedToken` - Not a three-part token, undecodable payload, or no subject
    /// * `InvalidSignature` - Not signed with the access secret (including refresh tokens)
    /// * `Expired` - Expiry is earlier than the current time
    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        self.validate_access_token_at(token, self.clock.now())
    }

    pub fn validate_access_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<AccessClaims, TokenError> {
        self.validate(token, now)
    }

    /// Validate a refresh token and return its claims.
    ///
    /// # Errors
    /// Same as [`TokenValidator::validate_access_token`], against the refresh secret.
    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        self.validate_refresh_token_at(token, self.clock.now())
    }

    pub fn validate_refresh_token_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshClaims, TokenError> {
        self.validate(token, now)
    }

    fn validate<F: Family>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims<F>, TokenError> {
        let handler = match F::FAMILY {
            TokenFamily::Access => &self.access,
            TokenFamily::Refresh => &self.refresh,
        };

        Self::check(handler, token, now).map_err(|e| {
            tracing::warn!(family = %F::FAMILY, kind = e.kind(), "Token validation failed: {}", e);
            e
        })
    }

    fn check<F: Family>(
        handler: &JwtHandler,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims<F>, TokenError> {
        let wire: Claims = handler.decode(token)?;
        let claims = TokenClaims::<F>::from_wire(wire)?;

        if claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
