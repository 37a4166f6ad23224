//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, CorsConfig, DatabaseConfig, LogFormat, LoggingConfig, PasswordConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
