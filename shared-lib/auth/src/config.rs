//! Token service configuration.

use std::fmt;

use auth_error::ConfigError;
use chrono::Duration;
use serde::Deserialize;

/// Environment variable holding the signing secret.
pub const SECRET_ENV: &str = "JWT_SECRET";
/// Environment variable holding the token lifetime in milliseconds.
pub const EXPIRATION_ENV: &str = "JWT_EXPIRATION_MS";

/// Lifetime used when a service only verifies tokens and sets none (24 hours).
pub const DEFAULT_EXPIRATION_MS: i64 = 86_400_000;

/// JWT configuration.
///
/// Field names deserialize from the `jwtSecret` / `jwtExpirationMs` keys
/// services already use in their settings files.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtConfig {
    /// Symmetric secret for signing tokens
    pub jwt_secret: String,
    /// Token validity duration in milliseconds
    #[serde(default = "default_expiration_ms")]
    pub jwt_expiration_ms: i64,
}

fn default_expiration_ms() -> i64 {
    DEFAULT_EXPIRATION_MS
}

impl JwtConfig {
    /// Create a new JWT configuration.
    pub fn new(secret: impl Into<String>, expiration_ms: i64) -> Self {
        Self {
            jwt_secret: secret.into(),
            jwt_expiration_ms: expiration_ms,
        }
    }

    /// Set the token lifetime.
    pub fn with_expiration_ms(mut self, expiration_ms: i64) -> Self {
        self.jwt_expiration_ms = expiration_ms;
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create configuration from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::Missing(SECRET_ENV.to_string()))?;

        let mut config = Self::new(secret, DEFAULT_EXPIRATION_MS);

        if let Some(raw) = lookup(EXPIRATION_ENV) {
            config.jwt_expiration_ms = raw.trim().parse::<i64>().map_err(|_| ConfigError::Invalid {
                name: EXPIRATION_ENV.to_string(),
                value: raw.clone(),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Missing(SECRET_ENV.to_string()));
        }
        if self.jwt_expiration_ms < 0 {
            return Err(ConfigError::Invalid {
                name: EXPIRATION_ENV.to_string(),
                value: self.jwt_expiration_ms.to_string(),
            });
        }
        Ok(())
    }

    /// Get token lifetime as Duration
    pub fn expiration(&self) -> Duration {
        Duration::milliseconds(self.jwt_expiration_ms)
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_ms", &self.jwt_expiration_ms)
            .finish()
    }
}
