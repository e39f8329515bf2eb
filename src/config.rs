use chrono::Duration;
use jsonwebtoken::Algorithm;
use std::env;
use thiserror::Error;

use crate::auth::TokenService;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/todoapp";
pub const DEFAULT_JWT_SECRET: &str = "CHANGE_ME";
pub const DEFAULT_CORS_ORIGINS: [&str; 5] = [
    "http://localhost:8081",
    "http://127.0.0.1:8081",
    "http://localhost:19006",
    "http://localhost:19000",
    "http://localhost:3000",
];

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup, falling back to
    /// defaults for anything unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("JWT_SECRET is not set; falling back to an insecure default");
            DEFAULT_JWT_SECRET.to_string()
        });
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: String::new(),
                reason: "must not be empty".into(),
            });
        }

        let access_token_expire_minutes =
            parse(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 60_i64)?;
        if access_token_expire_minutes <= 0 {
            return Err(ConfigError::Invalid {
                name: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: access_token_expire_minutes.to_string(),
                reason: "must be positive".into(),
            });
        }

        let cors_allowed_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            database_max_connections: parse(&lookup, "DATABASE_MAX_CONNECTIONS", 5_u32)?,
            server_port: parse(&lookup, "SERVER_PORT", 8080_u16)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_algorithm: parse_algorithm(lookup("JWT_ALGORITHM"))?,
            access_token_expire_minutes,
            cors_allowed_origins,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn token_service(&self) -> Result<TokenService, ConfigError> {
        TokenService::new(
            &self.jwt_secret,
            self.jwt_algorithm,
            Duration::minutes(self.access_token_expire_minutes),
        )
        .map_err(|e| ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            value: format!("{:?}", self.jwt_algorithm),
            reason: e.to_string(),
        })
    }
}

fn parse<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_algorithm(value: Option<String>) -> Result<Algorithm, ConfigError> {
    match value.as_deref().map(str::trim) {
        None | Some("HS256") => Ok(Algorithm::HS256),
        Some("HS384") => Ok(Algorithm::HS384),
        Some("HS512") => Ok(Algorithm::HS512),
        Some(other) => Err(ConfigError::Invalid {
            name: "JWT_ALGORITHM",
            value: other.to_string(),
            reason: "expected HS256, HS384 or HS512".into(),
        }),
    }
}
