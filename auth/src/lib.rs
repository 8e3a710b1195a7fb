//! Authentication and credential-lifecycle core
//!
//! Provides the pieces login handlers and request-authentication middleware
//! build on, with no dependency on any web framework:
//! - Password hashing (Argon2id, PHC-encoded credentials)
//! - Access and refresh token issuance (HS256, one secret per family)
//! - Token validation (structure, signature, subject, expiry)
//! - Layered configuration loading
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth_core::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth_core::{AuthConfig, Authenticator};
//!
//! let config = AuthConfig::new(
//!     "access_secret_at_least_32_bytes_long!",
//!     "refresh_secret_at_least_32_bytes_long!",
//! );
//! let auth = Authenticator::new(&config).unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue tokens
//! let pair = auth.authenticate("password123", &hash, "alice").unwrap();
//!
//! // Each request: validate the bearer token
//! let principal = auth.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(principal, "alice");
//!
//! // Access token expired: exchange the refresh token
//! let renewed = auth.refresh(&pair.refresh_token).unwrap();
//! # assert_eq!(auth.validate_access_token(&renewed.access_token).unwrap(), "alice");
//! ```

pub mod authenticator;
pub mod clock;
pub mod config;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenPair;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use crate::config::AuthConfig;
pub use crate::config::AuthConfigError;
pub use crate::config::PasswordConfig;
pub use crate::config::TokenConfig;
pub use jwt::AccessClaims;
pub use jwt::RefreshClaims;
pub use jwt::SignedToken;
pub use jwt::TokenError;
pub use jwt::TokenFamily;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
