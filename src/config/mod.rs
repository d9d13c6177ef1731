use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Token lifetime bounds, in hours
const JWT_EXPIRY_HOURS: std::ops::RangeInclusive<i64> = 1..=8760;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub tls_cert_path: PathBuf,
    pub tls_key_path: PathBuf,
    pub log_filter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    pub enable_cors: bool,
    pub require_https: bool,
}

/// Settings that have no sensible default. Startup aborts if any is absent.
struct Required {
    db_host: String,
    db_user: String,
    db_password: String,
    db_name: String,
    secret_key: String,
}

impl Required {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            db_host: required("DATABASE_HOST")?,
            db_user: required("DATABASE_USER")?,
            db_password: required("DATABASE_PASSWORD")?,
            db_name: required("DATABASE_NAME")?,
            secret_key: required("SECRET_KEY")?,
        })
    }
}

fn jwt_expiry_hours(raw: &str) -> Result<i64, ConfigError> {
    let invalid = |reason| ConfigError::Invalid {
        key: "SECURITY_JWT_EXPIRY_HOURS",
        value: raw.to_string(),
        reason,
    };

    let hours: i64 = raw.trim().parse().map_err(|_| invalid("not an integer"))?;
    if JWT_EXPIRY_HOURS.contains(&hours) {
        Ok(hours)
    } else {
        Err(invalid("must be between 1 and 8760"))
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::Missing(key)),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let required = Required::from_env()?;

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(required),
            Environment::Staging => Self::staging(required),
            Environment::Development => Self::development(required),
        };

        config.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Server overrides
        if let Ok(v) = env::var("SERVER_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("TLS_CERT_PATH") {
            self.server.tls_cert_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("TLS_KEY_PATH") {
            self.server.tls_key_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("RUST_LOG") {
            self.server.log_filter = v;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = jwt_expiry_hours(&v)?;
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }

        Ok(self)
    }

    fn base(environment: Environment, required: Required) -> Self {
        Self {
            environment,
            database: DatabaseConfig {
                host: required.db_host,
                user: required.db_user,
                password: required.db_password,
                name: required.db_name,
                max_connections: 20,
                connection_timeout: 30,
            },
            server: ServerConfig {
                port: 443,
                tls_cert_path: PathBuf::from("cert.pem"),
                tls_key_path: PathBuf::from("key.pem"),
                log_filter: "mygram=debug,tower_http=debug,info".to_string(),
            },
            security: SecurityConfig {
                jwt_secret: required.secret_key,
                jwt_expiry_hours: 24,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                enable_cors: true,
                require_https: true,
            },
        }
    }

    fn development(required: Required) -> Self {
        Self::base(Environment::Development, required)
    }

    fn staging(required: Required) -> Self {
        let mut config = Self::base(Environment::Staging, required);
        config.database.connection_timeout = 10;
        config.server.log_filter = "mygram=info,tower_http=info,warn".to_string();
        config
    }

    fn production(required: Required) -> Self {
        let mut config = Self::base(Environment::Production, required);
        config.database.connection_timeout = 5;
        config.server.log_filter = "mygram=info,warn".to_string();
        config
    }
}
