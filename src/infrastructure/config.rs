use std::env;
use thiserror::Error;

use crate::infrastructure::auth::JwtOptions;

const MIN_JWT_KEY_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    MissingKey(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub environment: String,
    pub seed_reference_data: bool,
    pub jwt: JwtOptions,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://liftlog.db?mode=rwc".to_string());

        let port = match env::var("PORT") {
            Ok(p) => p.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                reason: format!("'{}' is not a port number", p),
            })?,
            Err(_) => 8000,
        };

        let seed_reference_data = env::var("SEED_REFERENCE_DATA")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        Ok(Self {
            database_url,
            port,
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(Vec::new),
            environment: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            seed_reference_data,
            jwt: jwt_from_env()?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn jwt_from_env() -> Result<JwtOptions, ConfigError> {
    let key = env::var("JWT_KEY").map_err(|_| ConfigError::MissingKey("JWT_KEY"))?;
    if key.trim().len() < MIN_JWT_KEY_LENGTH {
        return Err(ConfigError::InvalidValue {
            key: "JWT_KEY",
            reason: format!("must be at least {} characters", MIN_JWT_KEY_LENGTH),
        });
    }

    let expiration_days = match env::var("JWT_EXPIRATION_DAYS") {
        Ok(v) => v
            .parse::<i64>()
            .ok()
            .filter(|d| (1..=30).contains(d))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "JWT_EXPIRATION_DAYS",
                reason: format!("'{}' is not a number of days between 1 and 30", v),
            })?,
        Err(_) => 7,
    };

    Ok(JwtOptions {
        key,
        issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "liftlog".to_string()),
        audience: env::var("JWT_AUDIENCE").unwrap_or_else(|_| "liftlog-clients".to_string()),
        expiration_days,
    })
}
