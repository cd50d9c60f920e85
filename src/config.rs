/*
 * Responsibility
 * - Read environment once at startup (DATABASE_URL, JWT secret/algorithm, CORS, ...)
 * - Validate values; anything missing or malformed fails startup
 * - The result is immutable and handed to services at construction
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub jwt_secret_key: String,
    pub jwt_algorithm: Algorithm,
    // Lifetime of access tokens issued at login (seconds)
    pub access_token_ttl_seconds: u64,

    pub cors_allowed_origins: Vec<String>,
    pub request_timeout_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the database url or signing secret
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);

        let jwt_secret_key =
            env::var("JWT_SECRET_KEY").map_err(|_| ConfigError::Missing("JWT_SECRET_KEY"))?;
        if jwt_secret_key.trim().is_empty() {
            return Err(ConfigError::Invalid("JWT_SECRET_KEY"));
        }

        let jwt_algorithm =
            parse_algorithm(&env::var("JWT_ALGORITHM").unwrap_or_else(|_| "HS256".to_string()))?;

        let access_token_ttl_seconds =
            parse_ttl(env::var("ACCESS_TOKEN_TTL_SECONDS").ok().as_deref())?;

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let request_timeout_seconds = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            jwt_secret_key,
            jwt_algorithm,
            access_token_ttl_seconds,
            cors_allowed_origins,
            request_timeout_seconds,
        })
    }
}

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: u64 = 20 * 60;
const MAX_ACCESS_TOKEN_TTL_SECONDS: u64 = 24 * 60 * 60;

/// Unset means the 20 minute default; anything else must be 1s..=1 day.
fn parse_ttl(raw: Option<&str>) -> Result<u64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_ACCESS_TOKEN_TTL_SECONDS);
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if (1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&secs) => Ok(secs),
        _ => Err(ConfigError::Invalid("ACCESS_TOKEN_TTL_SECONDS")),
    }
}

/// Tokens are signed with a shared secret, so only the HMAC family is accepted.
fn parse_algorithm(name: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(name.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::Invalid("JWT_ALGORITHM")),
    }
}
