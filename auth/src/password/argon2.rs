use argon2::password_hash;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;
use crate::config::PasswordConfig;

/// Shortest encoded credential accepted for comparison.
///
/// Anything shorter cannot carry an algorithm identifier, cost, salt and digest,
/// so it is rejected before the KDF runs.
pub const MIN_CREDENTIAL_LENGTH: usize = 60;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Credentials are PHC strings, so the algorithm, cost parameters and salt
/// travel with the digest and verification always uses the parameters a
/// credential was created with.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// # Returns
    /// PasswordHasher instance configured with Argon2id default costs
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Create a hasher with explicit cost parameters.
    ///
    /// # Errors
    /// * `InvalidParameters` - argon2 rejected the memory/iteration/parallelism combination
    pub fn from_config(config: &PasswordConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(PasswordError::HashingFailed)
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Errors
    /// * `MalformedCredential` - Stored hash is too short or cannot be parsed
    /// * `Mismatch` - Password does not match the stored hash
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), PasswordError> {
        if hash.len() < MIN_CREDENTIAL_LENGTH {
            tracing::error!(
                length = hash.len(),
                minimum = MIN_CREDENTIAL_LENGTH,
                "Stored credential is shorter than any valid hash"
            );
            return Err(PasswordError::MalformedCredential(format!(
                "encoded length {} is below minimum {}",
                hash.len(),
                MIN_CREDENTIAL_LENGTH
            )));
        }

        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::error!(error = %e, "Stored credential could not be parsed");
            PasswordError::MalformedCredential(format!("Invalid password hash: {}", e))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(password_hash::Error::Password) => Err(PasswordError::Mismatch),
            Err(e) => {
                tracing::error!(error = %e, "Stored credential is not usable for verification");
                Err(PasswordError::MalformedCredential(e.to_string()))
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::from_config(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build hasher")
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = fast_hasher();
        let password = "correct horse battery staple";

        let hash = hasher.hash(password).expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.len() >= MIN_CREDENTIAL_LENGTH);

        assert!(hasher.verify(password, &hash).is_ok());
        assert!(matches!(
            hasher.verify("wrong password", &hash),
            Err(PasswordError::Mismatch)
        ));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = fast_hasher();

        let first = hasher.hash("same_password").unwrap();
        let second = hasher.hash("same_password").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("same_password", &first).is_ok());
        assert!(hasher.verify("same_password", &second).is_ok());
    }

    #[test]
    fn test_default_costs_produce_verifiable_hash() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("my_secure_password").unwrap();

        assert!(hash.contains("m=19456,t=2,p=1"));
        assert!(hasher.verify("my_secure_password", &hash).is_ok());
    }

    #[test]
    fn test_verify_uses_parameters_from_credential() {
        let hash = fast_hasher().hash("portable").unwrap();

        // A hasher with different costs still verifies: the costs are embedded in the hash.
        assert!(PasswordHasher::new().verify("portable", &hash).is_ok());
    }

    #[test]
    fn test_verify_short_hash_is_malformed() {
        let hasher = fast_hasher();

        for hash in ["", "invalid_hash", "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA"] {
            let result = hasher.verify("password", hash);
            assert!(matches!(result, Err(PasswordError::MalformedCredential(_))));
        }
    }

    #[test]
    fn test_verify_unparseable_hash_is_malformed() {
        let hasher = fast_hasher();
        let garbage = "x".repeat(MIN_CREDENTIAL_LENGTH + 10);

        let result = hasher.verify("password", &garbage);
        assert!(matches!(result, Err(PasswordError::MalformedCredential(_))));
    }

    #[test]
    fn test_from_config_rejects_bad_parameters() {
        let result = PasswordHasher::from_config(&PasswordConfig {
            memory_kib: 1024,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }

    #[test]
    fn test_is_internal_classification() {
        assert!(!PasswordError::Mismatch.is_internal());
        assert!(PasswordError::MalformedCredential("short".into()).is_internal());
        assert!(PasswordError::HashingFailed(password_hash::Error::Crypto).is_internal());
    }
}
