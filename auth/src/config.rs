use std::env;
use std::fmt;

use chrono::Duration;
use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use thiserror::Error;

use crate::jwt::TokenFamily;

pub const DEFAULT_ACCESS_TTL_SECONDS: i64 = 15 * 60;
pub const DEFAULT_REFRESH_TTL_SECONDS: i64 = 7 * 24 * 60 * 60;
/// Upper bound on either family's TTL.
pub const MAX_TTL_SECONDS: i64 = 366 * 24 * 60 * 60;

/// Process-wide authentication configuration.
///
/// Loaded once at startup and passed by value into the hasher, issuer and
/// validator. Nothing in the crate reads configuration from global state.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub access: TokenConfig,
    pub refresh: TokenConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

/// Signing secret and lifetime for one token family.
#[derive(Deserialize, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl_seconds: i64,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    #[serde(default = "default_memory_kib")]
    pub memory_kib: u32,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_parallelism")]
    pub parallelism: u32,
}

#[derive(Debug, Error)]
pub enum AuthConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_memory_kib() -> u32 {
    argon2::Params::DEFAULT_M_COST
}

fn default_iterations() -> u32 {
    argon2::Params::DEFAULT_T_COST
}

fn default_parallelism() -> u32 {
    argon2::Params::DEFAULT_P_COST
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: default_memory_kib(),
            iterations: default_iterations(),
            parallelism: default_parallelism(),
        }
    }
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl_seconds: ttl.num_seconds(),
        }
    }

    /// Token lifetime, or `None` when `ttl_seconds` is out of range for a duration.
    pub fn ttl(&self) -> Option<Duration> {
        Duration::try_seconds(self.ttl_seconds)
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"[REDACTED]")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl AuthConfig {
    /// Build a configuration from explicit secrets with default TTLs and hashing costs.
    pub fn new(access_secret: impl Into<String>, refresh_secret: impl Into<String>) -> Self {
        Self {
            access: TokenConfig {
                secret: access_secret.into(),
                ttl_seconds: DEFAULT_ACCESS_TTL_SECONDS,
            },
            refresh: TokenConfig {
                secret: refresh_secret.into(),
                ttl_seconds: DEFAULT_REFRESH_TTL_SECONDS,
            },
            password: PasswordConfig::default(),
        }
    }

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (AUTH__ACCESS__SECRET, AUTH__REFRESH__TTL_SECONDS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in TTL and hashing defaults
    pub fn load() -> Result<Self, AuthConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH__ACCESS__SECRET=... overrides auth.access.secret
            .add_source(
                Environment::with_prefix("AUTH")
                    .prefix_separator("__")
                    .separator("__"),
            );

        Self::from_builder(builder)
    }

    /// Configuration builder preloaded with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let password = PasswordConfig::default();

        Config::builder()
            .set_default("access.ttl_seconds", DEFAULT_ACCESS_TTL_SECONDS)?
            .set_default("refresh.ttl_seconds", DEFAULT_REFRESH_TTL_SECONDS)?
            .set_default("password.memory_kib", password.memory_kib)?
            .set_default("password.iterations", password.iterations)?
            .set_default("password.parallelism", password.parallelism)
    }

    /// Deserialize and validate a fully layered builder.
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<Self, AuthConfigError> {
        let config: AuthConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        tracing::info!(
            access_ttl_seconds = config.access.ttl_seconds,
            refresh_ttl_seconds = config.refresh.ttl_seconds,
            memory_kib = config.password.memory_kib,
            iterations = config.password.iterations,
            parallelism = config.password.parallelism,
            "Authentication configuration loaded"
        );

        Ok(config)
    }

    /// Returns the settings for one token family.
    pub fn token(&self, family: TokenFamily) -> &TokenConfig {
        match family {
            TokenFamily::Access => &self.access,
            TokenFamily::Refresh => &self.refresh,
        }
    }

    /// Startup checks for the invariants the issuer and validator rely on.
    ///
    /// # Errors
    /// * `Invalid` - a secret is empty, both families share a secret, a TTL is
    ///   not positive or exceeds `MAX_TTL_SECONDS`, the access TTL is not shorter than the refresh TTL, or
    ///   argon2 rejects the hashing costs
    pub fn validate(&self) -> Result<(), AuthConfigError> {
        for family in [TokenFamily::Access, TokenFamily::Refresh] {
            let token = self.token(family);
            if token.secret.is_empty() {
                return Err(AuthConfigError::Invalid(format!(
                    "{} token secret is empty",
                    family
                )));
            }
            if token.ttl_seconds <= 0 {
                return Err(AuthConfigError::Invalid(format!(
                    "{} token TTL must be positive, got {}s",
                    family, token.ttl_seconds
                )));
            }
            if token.ttl_seconds > MAX_TTL_SECONDS {
                return Err(AuthConfigError::Invalid(format!(
                    "{} token TTL must be at most {}s, got {}s",
                    family, MAX_TTL_SECONDS, token.ttl_seconds
                )));
            }
        }

        if self.access.secret == self.refresh.secret {
            return Err(AuthConfigError::Invalid(
                "access and refresh tokens must use distinct secrets".to_string(),
            ));
        }

        if self.access.ttl_seconds >= self.refresh.ttl_seconds {
            return Err(AuthConfigError::Invalid(format!(
                "access TTL ({}s) must be shorter than refresh TTL ({}s)",
                self.access.ttl_seconds, self.refresh.ttl_seconds
            )));
        }

        argon2::Params::new(
            self.password.memory_kib,
            self.password.iterations,
            self.password.parallelism,
            None,
        )
        .map_err(|e| AuthConfigError::Invalid(format!("password hashing costs: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<AuthConfig, AuthConfigError> {
        let builder = AuthConfig::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml));
        AuthConfig::from_builder(builder)
    }

    #[test]
    fn test_load_applies_defaults() {
        let config = from_toml(
            r#"
            [access]
            secret = "access_secret_at_least_32_bytes_long"

            [refresh]
            secret = "refresh_secret_at_least_32_bytes_long"
            "#,
        )
        .expect("Failed to load configuration");

        assert_eq!(config.access.ttl(), Some(Duration::minutes(15)));
        assert_eq!(config.refresh.ttl(), Some(Duration::days(7)));
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_load_overrides_ttls_and_costs() {
        let config = from_toml(
            r#"
            [access]
            secret = "a"
            ttl_seconds = 60

            [refresh]
            secret = "b"
            ttl_seconds = 3600

            [password]
            memory_kib = 1024
            iterations = 1
            "#,
        )
        .unwrap();

        assert_eq!(config.access.ttl_seconds, 60);
        assert_eq!(config.refresh.ttl_seconds, 3600);
        assert_eq!(config.password.memory_kib, 1024);
        assert_eq!(config.password.iterations, 1);
        assert_eq!(config.password.parallelism, 1);
    }

    #[test]
    fn test_load_missing_secret_fails() {
        let result = from_toml(
            r#"
            [refresh]
            secret = "refresh"
            "#,
        );
        assert!(matches!(result, Err(AuthConfigError::Load(_))));
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let config = AuthConfig::new("", "refresh_secret");
        assert!(matches!(
            config.validate(),
            Err(AuthConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_shared_secret() {
        let config = AuthConfig::new("same_secret", "same_secret");
        assert!(matches!(
            config.validate(),
            Err(AuthConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_ttls() {
        let mut config = AuthConfig::new("access_secret", "refresh_secret");
        config.access.ttl_seconds = config.refresh.ttl_seconds;
        assert!(config.validate().is_err());

        config.access.ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_ttls() {
        let mut config = AuthConfig::new("access_secret", "refresh_secret");
        config.access.ttl_seconds = 10_000_000_000_000;
        config.refresh.ttl_seconds = 20_000_000_000_000;
        assert!(matches!(
            config.validate(),
            Err(AuthConfigError::Invalid(_))
        ));

        config.access.ttl_seconds = DEFAULT_ACCESS_TTL_SECONDS;
        config.refresh.ttl_seconds = MAX_TTL_SECONDS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_oversized_ttl_load_fails() {
        let result = from_toml(
            r#"
            [access]
            secret = "a"

            [refresh]
            secret = "b"
            ttl_seconds = 9223372036854775807
            "#,
        );
        assert!(matches!(result, Err(AuthConfigError::Invalid(_))));
    }

    #[test]
    fn test_token_config_new() {
        let token = TokenConfig::new("secret", Duration::minutes(5));
        assert_eq!(token.ttl_seconds, 300);
        assert_eq!(token.ttl(), Some(Duration::minutes(5)));

        let unbounded = TokenConfig {
            secret: "secret".to_string(),
            ttl_seconds: i64::MAX,
        };
        assert_eq!(unbounded.ttl(), None);
    }

    #[test]
    fn test_validate_rejects_bad_hashing_costs() {
        let mut config = AuthConfig::new("access_secret", "refresh_secret");
        config.password.parallelism = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = AuthConfig::new("super_secret_access", "super_secret_refresh");
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("super_secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
