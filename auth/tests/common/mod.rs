#![allow(dead_code)]

use std::sync::Arc;

use auth_core::AuthConfig;
use auth_core::Authenticator;
use auth_core::FixedClock;
use auth_core::PasswordConfig;
use auth_core::PasswordHasher;
use auth_core::TokenConfig;
use auth_core::TokenIssuer;
use auth_core::TokenValidator;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

pub const ACCESS_SECRET: &str = "integration_access_secret_32_bytes_long";
pub const REFRESH_SECRET: &str = "integration_refresh_secret_32_bytes_long";

/// Configuration with a 15 minute access TTL and cheap hashing costs.
pub fn test_config() -> AuthConfig {
    AuthConfig {
        access: TokenConfig::new(ACCESS_SECRET, Duration::minutes(15)),
        refresh: TokenConfig::new(REFRESH_SECRET, Duration::days(7)),
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

pub fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).expect("valid timestamp")
}

pub fn hasher() -> PasswordHasher {
    PasswordHasher::from_config(&test_config().password).expect("Failed to build hasher")
}

/// Issuer and validator sharing one configuration.
pub struct TokenHarness {
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
}

impl TokenHarness {
    pub fn new() -> Self {
        let config = test_config();
        Self {
            issuer: TokenIssuer::new(&config),
            validator: TokenValidator::new(&config),
        }
    }
}

/// Authenticator whose clock is frozen at `instant`.
pub fn authenticator_at(instant: DateTime<Utc>) -> Authenticator {
    Authenticator::with_clock(&test_config(), Arc::new(FixedClock::new(instant)))
        .expect("Failed to build authenticator")
}
