use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub manifest: ManifestConfig,
    pub upstream: UpstreamConfig,
    pub workers: WorkerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Redis-backed manifest cache.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestConfig {
    pub redis_url: String,

    /// Prepended to every decimal hash key.
    #[serde(default)]
    pub key_prefix: String,
}

/// Upstream statistics API.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_worker_count")]
    pub count: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// First activity instance id to process.
    #[serde(default)]
    pub first_instance_id: i64,

    /// How many consecutive instance ids to process.
    #[serde(default = "default_instance_count")]
    pub instance_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_metrics_listen")]
    pub listen: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen: default_metrics_listen(),
        }
    }
}

fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    2
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
fn default_upstream_base_url() -> String {
    "https://www.bungie.net".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_worker_count() -> usize {
    8
}
fn default_queue_capacity() -> usize {
    256
}
fn default_instance_count() -> u64 {
    1000
}
fn default_metrics_listen() -> String {
    "0.0.0.0:9090".to_string()
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
    /// 3. Environment variables with RP__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RP").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from embedded defaults plus overrides, without
    /// touching config files or the environment.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [database]
            url = ""
            max_connections = 5
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [manifest]
            redis_url = ""
            key_prefix = ""

            [upstream]
            base_url = "https://www.bungie.net"
            api_key = ""
            request_timeout_secs = 30

            [workers]
            count = 8
            queue_capacity = 256
            first_instance_id = 0
            instance_count = 1000

            [metrics]
            enabled = false
            listen = "127.0.0.1:9090"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RP__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.manifest.redis_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "RP__MANIFEST__REDIS_URL environment variable must be set".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if self.workers.count == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "workers.count must be at least 1".to_string(),
            ));
        }

        if self.workers.queue_capacity == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "workers.queue_capacity must be at least 1".to_string(),
            ));
        }

        if self.metrics.enabled && self.metrics.listen.parse::<SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidValue(format!(
                "metrics.listen '{}' is not a socket address",
                self.metrics.listen
            )));
        }

        Ok(())
    }
}
