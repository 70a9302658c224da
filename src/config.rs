use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const DEFAULT_PORT: u16 = 8080;
const CONFIG_DIR: &str = "config";
const DEFAULT_ORDER_CODE_PREFIX: &str = "EF";
const DEFAULT_RECEIPT_DIR: &str = "static/receipts";
const DEFAULT_PRODUCT_IMAGE_DIR: &str = "static/product_images";
const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;

/// Application configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Database connection URL
    pub database_url: String,

    /// Server host address
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Application environment
    pub environment: String,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,

    /// Whether to run database migrations on startup
    #[serde(default = "default_true_bool")]
    pub auto_migrate: bool,

    /// CORS: comma-separated list of allowed origins (production)
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// DB pool: max connections
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// DB pool: min connections
    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// DB timeouts (seconds)
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
    #[serde(default = "default_db_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,
    #[serde(default = "default_db_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    /// Two-letter prefix for generated order codes
    #[serde(default = "default_order_code_prefix")]
    #[validate(custom = "validate_order_code_prefix")]
    pub order_code_prefix: String,

    /// Directory for uploaded payment receipts
    #[serde(default = "default_receipt_dir")]
    pub receipt_dir: String,

    /// Directory for uploaded product images
    #[serde(default = "default_product_image_dir")]
    pub product_image_dir: String,

    /// Public base URL used when building payment links (trailing slash optional)
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Telegram bot token for admin notifications; unset disables dispatch
    #[serde(default)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id receiving admin notifications
    #[serde(default)]
    pub telegram_admin_chat_id: Option<String>,

    /// Outbound notification timeout (seconds)
    #[serde(default = "default_notify_timeout_secs")]
    pub notify_timeout_secs: u64,

    /// Bootstrap admin account, seeded only when no admin exists
    #[serde(default = "default_bootstrap_admin_username")]
    pub bootstrap_admin_username: String,

    /// Known weak default; must be changed through the change-password flow
    #[serde(default = "default_bootstrap_admin_password")]
    pub bootstrap_admin_password: String,

    /// Admin session token lifetime (seconds)
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Event channel capacity for async notification dispatch
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_true_bool() -> bool {
    true
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_db_connect_timeout_secs() -> u64 {
    30
}
fn default_db_idle_timeout_secs() -> u64 {
    600
}
fn default_db_acquire_timeout_secs() -> u64 {
    8
}
fn default_order_code_prefix() -> String {
    DEFAULT_ORDER_CODE_PREFIX.to_string()
}
fn default_receipt_dir() -> String {
    DEFAULT_RECEIPT_DIR.to_string()
}
fn default_product_image_dir() -> String {
    DEFAULT_PRODUCT_IMAGE_DIR.to_string()
}
fn default_public_base_url() -> String {
    format!("http://localhost:{}/", DEFAULT_PORT)
}
fn default_notify_timeout_secs() -> u64 {
    DEFAULT_NOTIFY_TIMEOUT_SECS
}
fn default_bootstrap_admin_username() -> String {
    "admin".to_string()
}
fn default_bootstrap_admin_password() -> String {
    "admin123".to_string()
}
fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}
fn default_event_channel_capacity() -> usize {
    1024
}

fn validate_order_code_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("order_code_prefix"))
    }
}

impl AppConfig {
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }

    /// Base URL with a guaranteed trailing slash, for link building.
    pub fn public_base_url(&self) -> String {
        if self.public_base_url.ends_with('/') {
            self.public_base_url.clone()
        } else {
            format!("{}/", self.public_base_url)
        }
    }

    pub fn notifications_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_admin_chat_id.is_some()
    }
}

#[derive(Debug, Error)]
pub enum AppConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Initializes tracing using the provided log level as the default filter
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("snackshop_api={},tower_http=debug", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .try_init();
    }
}

/// Loads application configuration
///
/// Layers configuration sources in this order:
/// 1. Default config (config/default.toml)
/// 2. Environment-specific config (config/{env}.toml)
/// 3. Environment variables (APP__*)
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let config = Config::builder()
        .set_default("database_url", "sqlite://snackshop.db?mode=rwc")?
        .set_default("host", "0.0.0.0")?
        .set_default("port", DEFAULT_PORT as i64)?
        .set_default("environment", DEFAULT_ENV)?
        .set_default("log_level", DEFAULT_LOG_LEVEL)?
        .set_default("log_json", false)?
        .add_source(File::with_name(&format!("{}/default", CONFIG_DIR)).required(false))
        .add_source(File::with_name(&format!("{}/{}", CONFIG_DIR, run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let app_config: AppConfig = config.try_deserialize()?;

    app_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        AppConfigError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(app_config)
}
