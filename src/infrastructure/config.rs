use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::domain::auth::AuthManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub port: u16,
    pub log_level: String,
    pub data_dir: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// True when `JWT_SECRET` was absent and an ephemeral one was generated.
    /// The warning is logged by the caller, after the logger exists.
    #[serde(default)]
    pub jwt_secret_generated: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 5000,
            log_level: "info".to_string(),
            data_dir: "data".to_string(),
            jwt_secret: String::new(),
            token_ttl_hours: 24,
            jwt_secret_generated: false,
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults. A missing `JWT_SECRET` gets a generated one, which means
    /// tokens do not survive a restart.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow!("PORT is not a valid port number: {raw}"))?,
            Err(_) => defaults.port,
        };

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(raw) => raw
                .parse::<i64>()
                .map_err(|_| anyhow!("TOKEN_TTL_HOURS is not a valid number: {raw}"))?,
            Err(_) => defaults.token_ttl_hours,
        };

        let (jwt_secret, jwt_secret_generated) = match env::var("JWT_SECRET") {
            Ok(secret) => (secret, false),
            Err(_) => (AuthManager::generate_jwt_secret(), true),
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            data_dir: env::var("DATA_DIR").unwrap_or(defaults.data_dir),
            jwt_secret,
            token_ttl_hours,
            jwt_secret_generated,
        })
    }

    /// Validate the loaded configuration, returning every problem found.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("port must be non-zero".to_string());
        }
        if self.data_dir.trim().is_empty() {
            errors.push("data_dir must not be empty".to_string());
        }
        if self.jwt_secret.len() < 32 {
            errors.push("jwt_secret must be at least 32 characters".to_string());
        }
        if self.token_ttl_hours <= 0 {
            errors.push("token_ttl_hours must be positive".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_shape() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.data_dir, "data");
        assert_eq!(config.token_ttl_hours, 24);
    }

    #[test]
    fn test_missing_jwt_secret_is_generated_and_flagged() {
        env::remove_var("JWT_SECRET");
        let config = Config::from_env().unwrap();
        assert!(config.jwt_secret_generated);
        assert!(config.jwt_secret.len() >= 32);

        env::set_var("JWT_SECRET", "configured_secret_0123456789abcdefgh");
        let config = Config::from_env().unwrap();
        assert!(!config.jwt_secret_generated);
        assert_eq!(config.jwt_secret, "configured_secret_0123456789abcdefgh");
        env::remove_var("JWT_SECRET");
    }

    #[test]
    fn test_validate_flags_bad_values() {
        let config = Config {
            port: 0,
            data_dir: "  ".to_string(),
            jwt_secret: "short".to_string(),
            token_ttl_hours: -1,
            ..Config::default()
        };

        let errors = config.validate();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        let config = Config {
            jwt_secret: AuthManager::generate_jwt_secret(),
            ..Config::default()
        };
        assert!(config.validate().is_empty());
    }
}
