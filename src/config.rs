//! Application configuration.
//!
//! Loaded once at startup from an optional TOML file merged with raw
//! environment variables (`REDIS_HOST`, `STORAGE_MODE`, ...). Environment
//! values win over the file.

use crate::leagues::LeagueConfig;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::postgres::PgConnectOptions;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Which storage backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMode {
    /// Single process-local map, lost on restart.
    InMemory,
    /// Redis fast cache in front of the PostgreSQL document store.
    RealDatabase,
}

impl StorageMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageMode::InMemory => "in_memory",
            StorageMode::RealDatabase => "real_database",
        }
    }
}

impl fmt::Display for StorageMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] Box<figment::Error>),
    #[error("missing required config key '{0}' for {1}")]
    Missing(&'static str, &'static str),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_shutdown_timeout", deserialize_with = "deserialize_duration")]
    pub shutdown_timeout: Duration,

    pub storage_mode: StorageMode,
    #[serde(default = "default_storage_timeout", deserialize_with = "deserialize_duration")]
    pub storage_timeout: Duration,

    #[serde(default = "default_host")]
    pub redis_host: String,
    #[serde(default = "default_redis_port")]
    pub redis_port: u16,
    #[serde(default = "default_cache_ttl", deserialize_with = "deserialize_duration")]
    pub cache_ttl: Duration,

    #[serde(default = "default_host")]
    pub database_host: String,
    #[serde(default = "default_database_port")]
    pub database_port: u16,
    pub database_user: Option<String>,
    pub database_password: Option<String>,
    #[serde(default = "default_database_name")]
    pub database_name: String,

    #[serde(default)]
    pub mock_mode: bool,
    #[serde(default = "default_rapidapi_host")]
    pub rapidapi_host: String,
    #[serde(default = "default_rapidapi_version")]
    pub rapidapi_version: String,
    pub rapidapi_key: Option<String>,
    #[serde(default = "default_requests_per_minute")]
    pub rapidapi_requests_per_minute: u32,

    /// country → alias → league
    #[serde(default)]
    pub leagues: BTreeMap<String, BTreeMap<String, LeagueConfig>>,
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_port() -> u16 {
    8080
}

fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(8)
}

fn default_storage_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_host() -> String {
    "127.0.0.1".to_owned()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(24 * 60 * 60)
}

fn default_database_port() -> u16 {
    5432
}

fn default_database_name() -> String {
    "standings".to_owned()
}

fn default_rapidapi_host() -> String {
    "api-football-v1.p.rapidapi.com".to_owned()
}

fn default_rapidapi_version() -> String {
    "v3".to_owned()
}

fn default_requests_per_minute() -> u32 {
    30
}

/// Accepts integer seconds or a human duration like `"24h"` or `"500ms"`.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => parse_duration(&text).map_err(serde::de::Error::custom),
    }
}

pub(crate) fn parse_duration(text: &str) -> Result<Duration, String> {
    let parsed = fundu::DurationParser::with_all_time_units()
        .parse(text.trim())
        .map_err(|e| format!("invalid duration '{text}': {e}"))?;
    Duration::try_from(parsed).map_err(|e| format!("invalid duration '{text}': {e}"))
}

impl Config {
    /// Load from `path` (if it exists) and the environment, then validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_figment(Figment::new().merge(Toml::file(path)).merge(Env::raw()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    /// Check keys whose requirement depends on other settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_mode == StorageMode::RealDatabase {
            if self.database_user.is_none() {
                return Err(ConfigError::Missing("database_user", "real_database storage"));
            }
            if self.database_password.is_none() {
                return Err(ConfigError::Missing(
                    "database_password",
                    "real_database storage",
                ));
            }
        }
        if !self.mock_mode && self.rapidapi_key.is_none() {
            return Err(ConfigError::Missing("rapidapi_key", "upstream fetching"));
        }
        Ok(())
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}/", self.redis_host, self.redis_port)
    }

    /// Postgres connection options built field by field, so credentials need no URL escaping.
    /// `None` when credentials are not configured.
    pub fn database_options(&self) -> Option<PgConnectOptions> {
        let user = self.database_user.as_deref()?;
        let password = self.database_password.as_deref()?;
        Some(
            PgConnectOptions::new()
                .host(&self.database_host)
                .port(self.database_port)
                .username(user)
                .password(password)
                .database(&self.database_name),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Result<Config, ConfigError> {
        Config::from_figment(Figment::new().merge(Toml::string(toml)))
    }

    #[test]
    fn defaults_applied() {
        let config = from_toml(
            r#"
            storage_mode = "in_memory"
            mock_mode = true
            "#,
        )
        .unwrap();
        assert_eq!(config.storage_mode, StorageMode::InMemory);
        assert_eq!(config.cache_ttl, Duration::from_secs(86_400));
        assert_eq!(config.storage_timeout, Duration::from_secs(5));
        assert_eq!(config.redis_port, 6379);
        assert_eq!(config.port, 8080);
        assert!(config.leagues.is_empty());
    }

    #[test]
    fn unknown_storage_mode_is_fatal() {
        let err = from_toml(
            r#"
            storage_mode = "flat_file"
            mock_mode = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn storage_mode_is_required() {
        assert!(matches!(from_toml("mock_mode = true"), Err(ConfigError::Load(_))));
    }

    #[test]
    fn real_database_requires_credentials() {
        let err = from_toml(
            r#"
            storage_mode = "real_database"
            mock_mode = true
            database_user = "standings"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("database_password", _)));
    }

    #[test]
    fn upstream_requires_key_outside_mock_mode() {
        let err = from_toml(r#"storage_mode = "in_memory""#).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("rapidapi_key", _)));
    }

    #[test]
    fn durations_accept_text_and_seconds() {
        let config = from_toml(
            r#"
            storage_mode = "in_memory"
            mock_mode = true
            cache_ttl = "2h"
            storage_timeout = 3
            shutdown_timeout = "500ms"
            "#,
        )
        .unwrap();
        assert_eq!(config.cache_ttl, Duration::from_secs(7200));
        assert_eq!(config.storage_timeout, Duration::from_secs(3));
        assert_eq!(config.shutdown_timeout, Duration::from_millis(500));
    }

    #[test]
    fn malformed_duration_rejected() {
        let err = from_toml(
            r#"
            storage_mode = "in_memory"
            mock_mode = true
            cache_ttl = "soon"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }

    #[test]
    fn connection_settings() {
        let config = from_toml(
            r#"
            storage_mode = "real_database"
            mock_mode = true
            redis_host = "cache"
            database_host = "db"
            database_user = "app"
            database_password = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.redis_url(), "redis://cache:6379/");
        let options = config.database_options().unwrap();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("standings"));
    }

    #[test]
    fn reserved_characters_in_credentials_do_not_leak_into_host() {
        let config = from_toml(
            r#"
            storage_mode = "real_database"
            mock_mode = true
            database_host = "db"
            database_user = "app@corp"
            database_password = "p@ss/w#rd"
            "#,
        )
        .unwrap();
        let options = config.database_options().unwrap();
        assert_eq!(options.get_host(), "db");
        assert_eq!(options.get_port(), 5432);
        assert_eq!(options.get_username(), "app@corp");
        assert_eq!(options.get_database(), Some("standings"));
    }

    #[test]
    fn database_options_absent_without_credentials() {
        let config = from_toml(
            r#"
            storage_mode = "in_memory"
            mock_mode = true
            "#,
        )
        .unwrap();
        assert!(config.database_options().is_none());
    }

    #[test]
    fn leagues_table_parsed() {
        let config = from_toml(
            r#"
            storage_mode = "in_memory"
            mock_mode = true

            [leagues.england.epl]
            id = 39
            name = "Premier League"
            type = "league"
            "#,
        )
        .unwrap();
        let england = &config.leagues["england"];
        assert_eq!(england["epl"].id, 39);
        assert_eq!(england["epl"].name, "Premier League");
    }
}
