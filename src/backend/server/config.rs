/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration.
 *
 * # Configuration Sources
 *
 * Configuration is read from environment variables (after `.env` has been
 * loaded by the binary), with defaults suitable for local development:
 *
 * | Variable              | Default               |
 * |-----------------------|-----------------------|
 * | `SERVER_PORT`         | `3000`                |
 * | `DATABASE_URL`        | unset: in-memory store |
 * | `SHARE_TOKEN_SECRET`  | development secret    |
 * | `PEER_QUEUE_CAPACITY` | `256`                 |
 *
 * # Error Handling
 *
 * Malformed values are reported as `ConfigError`. A database that cannot be
 * reached is logged and the server falls back to the in-memory store.
 */

use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;

use crate::backend::collab::state::DEFAULT_PEER_QUEUE_CAPACITY;
use crate::backend::projects::{MemoryProjectStore, PgProjectStore, ProjectStore};

const DEFAULT_PORT: u16 = 3000;
const DEVELOPMENT_SECRET: &str = "xfcanvas-development-secret-change-me";

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid port number, got {value:?}")]
    InvalidPort { name: &'static str, value: String },

    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidCapacity { name: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_url: Option<String>,
    pub share_token_secret: String,
    pub peer_queue_capacity: usize,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("peer_queue_capacity", &self.peer_queue_capacity)
            .finish_non_exhaustive()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            share_token_secret: DEVELOPMENT_SECRET.to_string(),
            peer_queue_capacity: DEFAULT_PEER_QUEUE_CAPACITY,
        }
    }
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("SERVER_PORT") {
            config.port = value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                name: "SERVER_PORT",
                value,
            })?;
        }

        config.database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        match lookup("SHARE_TOKEN_SECRET") {
            Some(secret) if secret.is_empty() => return Err(ConfigError::Empty("SHARE_TOKEN_SECRET")),
            Some(secret) => config.share_token_secret = secret,
            None => {
                tracing::warn!("SHARE_TOKEN_SECRET not set. Using the development secret.");
            }
        }

        if let Some(value) = lookup("PEER_QUEUE_CAPACITY") {
            config.peer_queue_capacity = parse_capacity(&value)?;
        }

        Ok(config)
    }
}

fn parse_capacity(value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(capacity) if capacity > 0 => Ok(capacity),
        _ => Err(ConfigError::InvalidCapacity {
            name: "PEER_QUEUE_CAPACITY",
            value: value.to_string(),
        }),
    }
}

/// Builder for `ServerConfig`
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    port: Option<u16>,
    database_url: Option<String>,
    share_token_secret: Option<String>,
    peer_queue_capacity: Option<usize>,
}

impl ServerConfigBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn share_token_secret(mut self, secret: impl Into<String>) -> Self {
        self.share_token_secret = Some(secret.into());
        self
    }

    pub fn peer_queue_capacity(mut self, capacity: usize) -> Self {
        self.peer_queue_capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let defaults = ServerConfig::default();

        let share_token_secret = self
            .share_token_secret
            .unwrap_or(defaults.share_token_secret);
        if share_token_secret.is_empty() {
            return Err(ConfigError::Empty("SHARE_TOKEN_SECRET"));
        }

        let peer_queue_capacity = self
            .peer_queue_capacity
            .unwrap_or(defaults.peer_queue_capacity);
        if peer_queue_capacity == 0 {
            return Err(ConfigError::InvalidCapacity {
                name: "PEER_QUEUE_CAPACITY",
                value: "0".to_string(),
            });
        }

        Ok(ServerConfig {
            port: self.port.unwrap_or(defaults.port),
            database_url: self.database_url,
            share_token_secret,
            peer_queue_capacity,
        })
    }
}

/// Connect to PostgreSQL and run migrations
///
/// # Returns
///
/// - `Some(PgPool)` if the database is reachable
/// - `None` if the connection fails
///
/// Migration failures are logged; the server continues with the pool.
pub async fn load_database(database_url: &str) -> Option<PgPool> {
    tracing::info!("[Store] Connecting to database...");

    let pool = match PgPool::connect(database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("[Store] Failed to create database connection pool: {:?}", e);
            return None;
        }
    };

    tracing::info!("[Store] Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(_) => tracing::info!("[Store] Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("[Store] Failed to run database migrations: {}", e);
            tracing::warn!("[Store] Continuing without migrations - database might not be up to date");
        }
    }

    Some(pool)
}

/// Pick the project store for this configuration
///
/// PostgreSQL when `DATABASE_URL` is set and reachable, otherwise an
/// in-memory store that loses everything on restart.
pub async fn load_project_store(config: &ServerConfig) -> Arc<dyn ProjectStore> {
    if let Some(url) = &config.database_url {
        if let Some(pool) = load_database(url).await {
            return Arc::new(PgProjectStore::new(pool));
        }
        tracing::warn!("[Store] Database unavailable. Falling back to the in-memory project store.");
    } else {
        tracing::warn!("[Store] DATABASE_URL not set. Projects will be kept in memory only.");
    }
    Arc::new(MemoryProjectStore::new())
}
