use std::time::Duration;

use serde::Deserialize;

use crate::infrastructure::keys::DEFAULT_DKIM_KEY_BITS;
use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
///
/// Layered from `config/default`, `config/local` and `APP__*` environment
/// variables, e.g. `APP__ADMIN__API_TOKEN`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub keys: KeysConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub operations: OperationsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

/// Domain store selection
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Required for the postgres backend
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeysConfig {
    /// RSA modulus size for DKIM keys, clamped to 1024..=4096
    #[serde(default = "default_dkim_key_bits")]
    pub dkim_key_bits: usize,
}

/// Operator authentication for the admin API
#[derive(Clone, Deserialize, Default)]
pub struct AdminConfig {
    /// Bearer token; the admin API rejects every request when unset
    #[serde(default)]
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperationsConfig {
    /// Upper bound for each domain operation; 0 disables the bound
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_dkim_key_bits() -> usize {
    DEFAULT_DKIM_KEY_BITS
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            dkim_key_bits: default_dkim_key_bits(),
        }
    }
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl OperationsConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `APP__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with_env(app_environment())
    }

    fn load_with_env(environment: config::Environment) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?;

        config.try_deserialize()
    }
}

fn app_environment() -> config::Environment {
    config::Environment::with_prefix("APP")
        .separator("__")
        .try_parsing(true)
}
