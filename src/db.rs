use crate::config::AppConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::{info, log};

/// Database connection tunables, derived from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sqlx_logging: bool,
}

impl DbConfig {
    pub fn from_app_config(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
            sqlx_logging: cfg.is_development(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://snackshop.db?mode=rwc".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
            sqlx_logging: false,
        }
    }
}

/// Establishes a database connection pool with the given configuration.
pub async fn establish_connection_with_config(cfg: DbConfig) -> Result<DatabaseConnection, DbErr> {
    info!("Connecting to database");

    let mut opts = ConnectOptions::new(cfg.url);
    opts.max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(cfg.connect_timeout)
        .idle_timeout(cfg.idle_timeout)
        .acquire_timeout(cfg.acquire_timeout)
        .sqlx_logging(cfg.sqlx_logging)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let conn = Database::connect(opts).await?;
    info!("Database connection established");
    Ok(conn)
}

pub async fn establish_connection(url: &str) -> Result<DatabaseConnection, DbErr> {
    establish_connection_with_config(DbConfig {
        url: url.to_string(),
        ..DbConfig::default()
    })
    .await
}

/// Verifies the connection is usable with a lightweight ping.
pub async fn check_connection(conn: &DatabaseConnection) -> Result<(), DbErr> {
    conn.ping().await
}
