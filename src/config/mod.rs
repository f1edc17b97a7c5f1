//! Application configuration

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, KeysConfig, LogFormat, LoggingConfig, OperationsConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
