//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/workshop-service/config.toml`).
//! Every field has a default, so a partial file is enough and a missing file
//! yields [`AppConfig::default`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::{DatabaseConfig, PoolConfig};
use crate::shared::types::MAX_PAGE_LIMIT;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV: &str = "WORKSHOP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub logging: LoggingSection,
    pub admin: AdminSection,
    pub pagination: PaginationSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub api_host: String,
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let pool = PoolConfig::default();
        Self {
            url: DatabaseConfig::default().url,
            max_connections: pool.max_connections,
            min_connections: pool.min_connections,
            connect_timeout_secs: pool.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecuritySection {
    fn default() -> Self {
        Self {
            jwt_secret: JwtConfig::default().secret,
            jwt_expiration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, e.g. `info` or `workshop=debug,tower_http=info`
    pub level: String,
    /// `plain` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "plain".to_string(),
        }
    }
}

/// Account created on first start when the users table is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSection {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            name: "Administrator".to_string(),
            email: "admin@workshop.local".to_string(),
            password: "admin12345".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSection {
    /// Page size for list requests without a valid `limit`; at most 100.
    pub default_limit: u64,
}

impl Default for PaginationSection {
    fn default() -> Self {
        Self { default_limit: 10 }
    }
}

/// `~/.config/workshop-service/config.toml`, or `./config.toml` without a home directory.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .map(|dir| dir.join("workshop-service").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file does not exist.
    /// Environment overrides are applied afterwards.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = url;
        }
        if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
            self.security.jwt_secret = secret;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret must not be empty".into()));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if !(4..=31).contains(&self.security.bcrypt_cost) {
            return Err(ConfigError::Invalid("security.bcrypt_cost must be in 4..=31".into()));
        }
        let limit = self.pagination.default_limit;
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "pagination.default_limit must be in 1..={}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(())
    }

    pub fn api_address(&self) -> String {
        format!("{}:{}", self.server.api_host, self.server.api_port)
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            pool: PoolConfig {
                max_connections: self.database.max_connections,
                min_connections: self.database.min_connections,
                connect_timeout_secs: self.database.connect_timeout_secs,
            },
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            ..JwtConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [security]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.api_port, 9090);
        assert_eq!(config.server.api_host, "0.0.0.0");
        assert_eq!(config.security.jwt_secret, "s3cret");
        assert_eq!(config.security.jwt_expiration_hours, 24);
        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.api_address(), "0.0.0.0:9090");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = AppConfig::from_toml("[server]\napi_port = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "DATABASE_URL" => Some("postgres://shop@db/workshop".to_string()),
            "JWT_SECRET" => Some(String::new()),
            _ => None,
        });
        assert_eq!(config.database.url, "postgres://shop@db/workshop");
        assert_eq!(config.security.jwt_secret, JwtConfig::default().secret);
        assert_eq!(config.database_config().url, "postgres://shop@db/workshop");
    }

    #[test]
    fn validation_catches_bad_limits() {
        let mut config = AppConfig::default();
        config.pagination.default_limit = 500;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = AppConfig::default();
        config.security.jwt_expiration_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("workshop-service-missing-config.toml");
        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.api_port, 8080);
    }
}
