//! Server configuration

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 86_400;
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_DB_MAX_POOL_SIZE: usize = 16;

/// Minimum signing secret length in bytes
pub const MIN_SECRET_BYTES: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Configuration for the blog server
#[derive(Clone)]
pub struct AppConfig {
    /// Postgres connection string
    pub database_url: String,
    /// HMAC key for session tokens
    pub jwt_secret: String,
    pub groq_api_key: String,
    /// Upload is disabled when unset
    pub cloudinary_url: Option<String>,
    pub bind_addr: SocketAddr,
    pub token_ttl: Duration,
    /// Account seeded at startup when absent
    pub admin_username: String,
    pub admin_password: String,
    pub db_max_pool_size: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("token_ttl", &self.token_ttl)
            .field("admin_username", &self.admin_username)
            .field("upload_enabled", &self.cloudinary_url.is_some())
            .field("db_max_pool_size", &self.db_max_pool_size)
            .finish_non_exhaustive()
    }
}

impl AppConfig {
    /// Read the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let database_url = require("DATABASE_URL")?;

        let jwt_secret = require("JWT_SECRET")?;
        if jwt_secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_BYTES),
            });
        }

        let groq_api_key = require("GROQ_API_KEY")?;

        let bind_addr: SocketAddr = parse_or(
            "BIND_ADDR",
            get("BIND_ADDR"),
            DEFAULT_BIND_ADDR.parse().ok(),
        )?;
        let token_ttl_secs =
            parse_or("TOKEN_TTL_SECS", get("TOKEN_TTL_SECS"), Some(DEFAULT_TOKEN_TTL_SECS))?;
        if token_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "TOKEN_TTL_SECS",
                reason: "must be positive".to_string(),
            });
        }
        let db_max_pool_size = parse_or(
            "DB_MAX_POOL_SIZE",
            get("DB_MAX_POOL_SIZE"),
            Some(DEFAULT_DB_MAX_POOL_SIZE),
        )?;

        Ok(Self {
            database_url,
            jwt_secret,
            groq_api_key,
            cloudinary_url: get("CLOUDINARY_URL"),
            bind_addr,
            token_ttl: Duration::from_secs(token_ttl_secs),
            admin_username: get("ADMIN_USERNAME")
                .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
            admin_password: get("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            db_max_pool_size,
        })
    }
}

fn parse_or<T>(
    name: &'static str,
    raw: Option<String>,
    default: Option<T>,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => default.ok_or(ConfigError::Missing(name)),
    }
}
