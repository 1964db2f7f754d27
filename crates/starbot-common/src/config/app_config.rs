//! Bootstrap configuration
//!
//! Loaded once at startup from environment variables (and a `.env` file if
//! present). Runtime-editable settings such as the starboard emoji live in
//! the `settings` namespace of the store, not here.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use starbot_core::Snowflake;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bot: BotSettings,
    pub storage: StorageConfig,
    pub points: PointsPolicy,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Connection settings for the chat platform
#[derive(Clone)]
pub struct BotSettings {
    pub token: String,
    pub guild_id: Snowflake,
    pub command_prefix: String,
}

impl std::fmt::Debug for BotSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotSettings")
            .field("token", &"<redacted>")
            .field("guild_id", &self.guild_id)
            .field("command_prefix", &self.command_prefix)
            .finish()
    }
}

/// Persisted state location
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    /// Directory holding the namespaces of one guild
    #[must_use]
    pub fn guild_dir(&self, guild_id: Snowflake) -> PathBuf {
        self.data_dir.join(guild_id.to_string())
    }
}

/// Timing of the voice points tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsPolicy {
    /// Seconds between two scoring ticks
    pub interval_secs: u64,
    /// Records that gained a point longer ago than this are not displayed
    pub recency_secs: u64,
    /// Unrelated messages after which the summary is reposted instead of edited
    pub bury_threshold: u32,
}

impl PointsPolicy {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    #[must_use]
    pub fn recency(&self) -> Duration {
        Duration::from_secs(self.recency_secs)
    }
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            interval_secs: default_points_interval(),
            recency_secs: default_points_recency(),
            bury_threshold: default_bury_threshold(),
        }
    }
}

// Default value functions
fn default_command_prefix() -> String {
    "&".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./local")
}

fn default_points_interval() -> u64 {
    180
}

fn default_points_recency() -> u64 {
    120 // 2 minutes
}

fn default_bury_threshold() -> u32 {
    3
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or
    /// a variable holds a value of the wrong shape
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = match lookup("APP_ENV") {
            Some(raw) => Environment::parse(&raw)
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw))?,
            None => Environment::default(),
        };

        let token = lookup("DISCORD_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingVar("DISCORD_TOKEN"))?;

        let guild_raw = lookup("GUILD_ID").ok_or(ConfigError::MissingVar("GUILD_ID"))?;
        let guild_id = Snowflake::parse(&guild_raw)
            .ok()
            .filter(|id| !id.is_zero())
            .ok_or_else(|| ConfigError::InvalidValue("GUILD_ID", guild_raw.clone()))?;

        let interval_secs = parse_or(&lookup, "POINTS_INTERVAL_SECS", default_points_interval)?;
        if interval_secs == 0 {
            return Err(ConfigError::InvalidValue("POINTS_INTERVAL_SECS", "0".to_string()));
        }

        Ok(Self {
            env,
            bot: BotSettings {
                token: token.trim().to_string(),
                guild_id,
                command_prefix: lookup("COMMAND_PREFIX")
                    .filter(|p| !p.is_empty())
                    .unwrap_or_else(default_command_prefix),
            },
            storage: StorageConfig {
                data_dir: lookup("DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(default_data_dir),
            },
            points: PointsPolicy {
                interval_secs,
                recency_secs: parse_or(&lookup, "POINTS_RECENCY_SECS", default_points_recency)?,
                bury_threshold: parse_or(&lookup, "POINTS_BURY_THRESHOLD", default_bury_threshold)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: fn() -> T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key, raw)),
        None => Ok(default()),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
