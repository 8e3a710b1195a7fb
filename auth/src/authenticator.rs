use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::AuthConfig;
use crate::jwt::TokenError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and token handling.
///
/// This is the surface request handlers and middleware talk to. It carries no
/// HTTP types: callers strip the `Bearer ` prefix themselves and map errors to
/// responses.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    issuer: TokenIssuer,
    validator: TokenValidator,
    clock: Arc<dyn Clock>,
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator using wall-clock time.
    ///
    /// # Errors
    /// * `InvalidParameters` - The configured hashing costs are rejected by argon2
    pub fn new(config: &AuthConfig) -> Result<Self, PasswordError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Result<Self, PasswordError> {
        Ok(Self {
            password_hasher: PasswordHasher::from_config(&config.password)?,
            issuer: TokenIssuer::with_clock(config, Arc::clone(&clock)),
            validator: TokenValidator::with_clock(config, Arc::clone(&clock)),
            clock,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored credential.
    ///
    /// # Errors
    /// * `Mismatch` - Password does not match
    /// * `MalformedCredential` - Stored credential is corrupt
    pub fn verify_password(&self, password: &str, credential: &str) -> Result<(), PasswordError> {
        self.password_hasher.verify(password, credential)
    }

    pub fn issue_access_token(&self, principal: &str) -> Result<String, TokenError> {
        self.issuer
            .issue_access_token(principal)
            .map(|token| token.into_string())
    }

    pub fn issue_refresh_token(&self, principal: &str) -> Result<String, TokenError> {
        self.issuer
            .issue_refresh_token(principal)
            .map(|token| token.into_string())
    }

    /// Validate an access token and return the principal it was issued for.
    pub fn validate_access_token(&self, token: &str) -> Result<String, TokenError> {
        self.validator
            .validate_access_token(token)
            .map(|claims| claims.into_principal())
    }

    /// Validate a refresh token and return the principal it was issued for.
    pub fn validate_refresh_token(&self, token: &str) -> Result<String, TokenError> {
        self.validator
            .validate_refresh_token(token)
            .map(|claims| claims.into_principal())
    }

    /// Issue an access/refresh pair stamped with the same instant.
    pub fn issue_token_pair(&self, principal: &str) -> Result<TokenPair, TokenError> {
        self.issue_token_pair_at(principal, self.clock.now())
    }

    fn issue_token_pair_at(
        &self,
        principal: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, TokenError> {
        let access = self.issuer.issue_access_token_at(principal, now)?;
        let refresh = self.issuer.issue_refresh_token_at(principal, now)?;

        Ok(TokenPair {
            access_expires_at: access.expires_at(),
            access_token: access.into_string(),
            refresh_expires_at: refresh.expires_at(),
            refresh_token: refresh.into_string(),
        })
    }

    /// Verify credentials and issue a token pair.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored credential is unusable
    /// * `Token` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        principal: &str,
    ) -> Result<TokenPair, AuthenticationError> {
        match self.password_hasher.verify(password, stored_hash) {
            Ok(()) => {}
            Err(PasswordError::Mismatch) => {
                tracing::info!(principal = %principal, "Authentication rejected");
                return Err(AuthenticationError::InvalidCredentials);
            }
            Err(e) => return Err(e.into()),
        }

        let pair = self.issue_token_pair(principal)?;
        tracing::info!(principal = %principal, "Authentication succeeded");

        Ok(pair)
    }

    /// Exchange a valid refresh token for a new token pair.
    ///
    /// # Errors
    /// * `MalformedToken` / `InvalidSignature` / `Expired` - The refresh token is not acceptable
    /// * `Configuration` - A signing secret is missing
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        let now = self.clock.now();
        let claims = self.validator.validate_refresh_token_at(refresh_token, now)?;

        self.issue_token_pair_at(claims.principal(), now)
    }

    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    pub fn validator(&self) -> &TokenValidator {
        &self.validator
    }
}
