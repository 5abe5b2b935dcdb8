use std::env;

use auth::SigningAlgorithm;
use auth::TokenLifetimes;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub superuser: Option<SuperuserConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Which user store backs the service.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,
    #[serde(default = "default_refresh_token_expire_days")]
    pub refresh_token_expire_days: i64,
}

/// Upper bound for `access_token_expire_minutes` (one year).
pub const MAX_ACCESS_TOKEN_EXPIRE_MINUTES: i64 = 60 * 24 * 365;

/// Upper bound for `refresh_token_expire_days` (ten years).
pub const MAX_REFRESH_TOKEN_EXPIRE_DAYS: i64 = 365 * 10;

impl JwtConfig {
    /// Token lifetimes built from the configured TTLs.
    ///
    /// # Errors
    /// * `ConfigError::Message` - A TTL is not positive or exceeds its bound
    pub fn lifetimes(&self) -> Result<TokenLifetimes, ConfigError> {
        let access = bounded_ttl(
            "jwt.access_token_expire_minutes",
            self.access_token_expire_minutes,
            MAX_ACCESS_TOKEN_EXPIRE_MINUTES,
        )
        .and_then(|minutes| {
            chrono::Duration::try_minutes(minutes).ok_or_else(|| {
                ConfigError::Message("jwt.access_token_expire_minutes out of range".to_string())
            })
        })?;

        let refresh = bounded_ttl(
            "jwt.refresh_token_expire_days",
            self.refresh_token_expire_days,
            MAX_REFRESH_TOKEN_EXPIRE_DAYS,
        )
        .and_then(|days| {
            chrono::Duration::try_days(days).ok_or_else(|| {
                ConfigError::Message("jwt.refresh_token_expire_days out of range".to_string())
            })
        })?;

        Ok(TokenLifetimes::new(access, refresh))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lifetimes().map(|_| ())
    }
}

fn bounded_ttl(key: &str, value: i64, max: i64) -> Result<i64, ConfigError> {
    if value <= 0 || value > max {
        return Err(ConfigError::Message(format!(
            "{} must be between 1 and {}, got {}",
            key, max, value
        )));
    }
    Ok(value)
}

/// Superuser ensured at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct SuperuserConfig {
    pub email: String,
    pub password: String,
}

fn default_http_port() -> u16 {
    8000
}

fn default_max_connections() -> u32 {
    5
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_refresh_token_expire_days() -> i64 {
    7
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        Self::from_configuration(configuration)
    }

    /// Deserialize and reject values the service cannot run with.
    fn from_configuration(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Self = configuration.try_deserialize()?;
        config.jwt.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(source: &str) -> Result<Config, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Config::from_configuration(configuration)
    }

    fn jwt_with_ttls(access_minutes: i64, refresh_days: i64) -> String {
        format!(
            "[jwt]\nsecret = \"s3cret\"\naccess_token_expire_minutes = {}\nrefresh_token_expire_days = {}\n",
            access_minutes, refresh_days
        )
    }

    #[test]
    fn test_defaults_apply() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_port, 8000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.jwt.algorithm, SigningAlgorithm::HS256);
        assert_eq!(config.jwt.access_token_expire_minutes, 30);
        assert_eq!(config.jwt.refresh_token_expire_days, 7);
        assert!(config.superuser.is_none());
        assert_eq!(config.jwt.lifetimes().unwrap(), TokenLifetimes::default());
    }

    #[test]
    fn test_explicit_values() {
        let config = from_toml(
            r#"
            [server]
            http_port = 9000

            [storage]
            backend = "memory"

            [jwt]
            secret = "s3cret"
            algorithm = "HS512"
            access_token_expire_minutes = 5
            refresh_token_expire_days = 1

            [superuser]
            email = "root@x.com"
            password = "root-pw"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.jwt.algorithm, SigningAlgorithm::HS512);
        assert_eq!(
            config.jwt.lifetimes().unwrap(),
            TokenLifetimes::new(chrono::Duration::minutes(5), chrono::Duration::days(1))
        );
        assert_eq!(config.superuser.unwrap().email, "root@x.com");
    }

    #[test]
    fn test_secret_is_required() {
        assert!(from_toml("[server]\nhttp_port = 9000\n").is_err());
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let result = from_toml(
            r#"
            [jwt]
            secret = "s3cret"
            algorithm = "none"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_non_positive_ttls_are_rejected() {
        assert!(from_toml(&jwt_with_ttls(-5, 7)).is_err());
        assert!(from_toml(&jwt_with_ttls(0, 7)).is_err());
        assert!(from_toml(&jwt_with_ttls(30, -1)).is_err());
        assert!(from_toml(&jwt_with_ttls(30, 0)).is_err());
    }

    #[test]
    fn test_huge_ttls_are_rejected() {
        assert!(from_toml(&jwt_with_ttls(30, i64::MAX)).is_err());
        assert!(from_toml(&jwt_with_ttls(30, 100_000_000_000)).is_err());
        assert!(from_toml(&jwt_with_ttls(i64::MAX, 7)).is_err());
        assert!(from_toml(&jwt_with_ttls(30, MAX_REFRESH_TOKEN_EXPIRE_DAYS + 1)).is_err());
    }

    #[test]
    fn test_ttl_bounds_are_inclusive() {
        let config = from_toml(&jwt_with_ttls(
            MAX_ACCESS_TOKEN_EXPIRE_MINUTES,
            MAX_REFRESH_TOKEN_EXPIRE_DAYS,
        ))
        .unwrap();

        let lifetimes = config.jwt.lifetimes().unwrap();
        assert_eq!(lifetimes.access, chrono::Duration::days(365));
        assert_eq!(lifetimes.refresh, chrono::Duration::days(3650));
    }
}
