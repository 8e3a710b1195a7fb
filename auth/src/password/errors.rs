use argon2::password_hash;
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    /// The KDF failed internally. Not caused by user input.
    #[error("Password hashing failed: {0}")]
    HashingFailed(#[source] password_hash::Error),

    #[error("Password does not match")]
    Mismatch,

    /// The stored credential is truncated or not a recognised hash encoding.
    #[error("Stored credential is malformed: {0}")]
    MalformedCredential(String),

    #[error("Invalid hashing parameters: {0}")]
    InvalidParameters(String),
}

impl PasswordError {
    /// True for failures that indicate a server-side problem rather than a wrong password.
    pub fn is_internal(&self) -> bool {
        !matches!(self, PasswordError::Mismatch)
    }
}
