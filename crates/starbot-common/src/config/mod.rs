//! Configuration structs

mod app_config;

pub use app_config::{AppConfig, BotSettings, ConfigError, Environment, PointsPolicy, StorageConfig};
