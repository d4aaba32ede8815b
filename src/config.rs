//! Process configuration, read once from the environment and handed to
//! constructors. Nothing here is global.

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::error::{CatalogError, ConfigError};
use crate::sql::MAX_PAGE_LIMIT;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub statement_timeout: Option<Duration>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: "password".into(),
            name: "movies".into(),
            max_connections: 5,
            statement_timeout: None,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        let opts = match &self.url {
            Some(url) => PgConnectOptions::from_str(url).map_err(|e| ConfigError::InvalidValue {
                key: "DATABASE_URL",
                value: e.to_string(),
            })?,
            None => PgConnectOptions::new()
                .host(&self.host)
                .port(self.port)
                .username(&self.user)
                .password(&self.password)
                .database(&self.name),
        };
        Ok(match self.statement_timeout {
            Some(t) => opts.options([("statement_timeout", format!("{}ms", t.as_millis()))]),
            None => opts,
        })
    }

    pub async fn connect(&self) -> Result<PgPool, CatalogError> {
        let opts = self.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(opts)
            .await?;
        Ok(pool)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogConfig {
    pub database: DatabaseConfig,
    pub port: u16,
    pub log_level: String,
    /// Upper bound for list page sizes; larger requests are clamped.
    pub max_page_limit: i64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            database: DatabaseConfig::default(),
            port: 7777,
            log_level: "info".into(),
            max_page_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl CatalogConfig {
    /// Read `.env` from the working directory when present, then the environment.
    /// Variables already set in the process win over the file.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(ConfigError::Load(e.to_string())),
        }
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = CatalogConfig::default();
        let db = defaults.database;

        let database = DatabaseConfig {
            url: get("DATABASE_URL"),
            host: get("DB_HOST").unwrap_or(db.host),
            port: parse_or("DB_PORT", get("DB_PORT"), db.port)?,
            user: get("DB_USER").unwrap_or(db.user),
            password: get("DB_PASSWORD").unwrap_or(db.password),
            name: get("DB_NAME").unwrap_or(db.name),
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), db.max_connections)?,
            statement_timeout: get("DB_STATEMENT_TIMEOUT_MS")
                .map(|v| parse_or("DB_STATEMENT_TIMEOUT_MS", Some(v), 0u64))
                .transpose()?
                .map(Duration::from_millis),
        };

        let max_page_limit = parse_or("CATALOG_MAX_PAGE_LIMIT", get("CATALOG_MAX_PAGE_LIMIT"), defaults.max_page_limit)?;
        if max_page_limit <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "CATALOG_MAX_PAGE_LIMIT",
                value: max_page_limit.to_string(),
            });
        }

        Ok(CatalogConfig {
            database,
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            log_level: get("CATALOG_LOG_LEVEL").unwrap_or(defaults.log_level),
            max_page_limit,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.parse().map_err(|_| ConfigError::InvalidValue { key, value: v }),
    }
}
