//! Runtime configuration loaded from environment variables

use thiserror::Error;

/// Minimum HS256 signing key length in bytes.
///
/// Keys shorter than the hash output size weaken the HMAC; refuse them at
/// startup rather than at sign time.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Service-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub redis_url: String,
    pub jwt: JwtSettings,
}

/// Token issuance settings.
///
/// A single `token_ttl_minutes` drives both the token's embedded expiry and
/// the whitelist entry TTL so the two can never drift apart.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub token_ttl_minutes: i64,
}

impl Config {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = optional("PORT")
            .unwrap_or_else(|| "3001".to_string())
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("{}", e),
            })?;

        let jwt = JwtSettings {
            secret: required("JWT_SECRET")?,
            issuer: optional("JWT_ISSUER").unwrap_or_else(|| "backoffice".to_string()),
            audience: optional("JWT_AUDIENCE").unwrap_or_else(|| "backoffice-api".to_string()),
            token_ttl_minutes: optional("JWT_TTL_MINUTES")
                .unwrap_or_else(|| "60".to_string())
                .parse()
                .map_err(|e| ConfigError::Invalid {
                    name: "JWT_TTL_MINUTES",
                    reason: format!("{}", e),
                })?,
        };
        jwt.validate()?;

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            redis_url: optional("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1/".to_string()),
            jwt,
        })
    }
}

impl JwtSettings {
    /// Reject unusable settings at load time, not at sign time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.as_bytes().len() < MIN_SIGNING_KEY_BYTES {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SIGNING_KEY_BYTES),
            });
        }
        if self.token_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_TTL_MINUTES",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn optional(name: &'static str) -> Option<String> {
    std::env::var(name).ok()
}
