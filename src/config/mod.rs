//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, CacheBackend, CacheSettings, DatabaseBackend, DatabaseConfig,
    LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
};
