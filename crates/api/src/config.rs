use serde::Deserialize;
use std::net::SocketAddr;

use persistence::store::Namespace;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

/// Document store connection and addressing.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Store backend: postgres or memory
    #[serde(default = "default_store_backend")]
    pub backend: String,

    /// Connection URL (required for the postgres backend)
    #[serde(default)]
    pub url: String,

    /// Logical database the records live in
    #[serde(default = "default_store_database")]
    pub database: String,

    /// Collection holding config records
    #[serde(default = "default_store_collection")]
    pub collection: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Number of records returned by the list-recent endpoint
    #[serde(default = "default_recent_records")]
    pub recent_records: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            recent_records: default_recent_records(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_store_backend() -> String {
    "postgres".to_string()
}
fn default_store_database() -> String {
    "avProductConfig".to_string()
}
fn default_store_collection() -> String {
    "configs".to_string()
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_recent_records() -> i64 {
    10
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with PC__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("PC").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Builds the config from embedded defaults and overrides only, so tests
    /// do not depend on the working directory.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576

            [store]
            backend = "memory"
            url = ""
            database = "avProductConfig"
            collection = "configs"
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [limits]
            recent_records = 10
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Validation is skipped to allow partial configs
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        match self.store.backend.as_str() {
            "postgres" => {
                if self.store.url.is_empty() {
                    return Err(ConfigValidationError::MissingRequired(
                        "PC__STORE__URL environment variable must be set".to_string(),
                    ));
                }
            }
            "memory" => {}
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown store backend '{}' (expected postgres or memory)",
                    other
                )));
            }
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.store.min_connections > self.store.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.limits.recent_records <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "recent_records must be positive".to_string(),
            ));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }

    /// Namespace holding config records.
    pub fn namespace(&self) -> Namespace {
        Namespace::new(&self.store.database, &self.store.collection)
    }
}

impl From<&StoreConfig> for persistence::db::DatabaseConfig {
    fn from(store: &StoreConfig) -> Self {
        Self {
            url: store.url.clone(),
            max_connections: store.max_connections,
            min_connections: store.min_connections,
            connect_timeout_secs: store.connect_timeout_secs,
            idle_timeout_secs: store.idle_timeout_secs,
        }
    }
}
