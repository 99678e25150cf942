use crate::error::{config_error, env_error, ScheduleResult};
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default Redis connection string
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default timezone all wall-clock times are interpreted in
pub const DEFAULT_TIMEZONE: &str = "Asia/Tehran";

/// Default port for the schedule API
pub const DEFAULT_PORT: u16 = 3000;

/// Optional file with overrides for the environment configuration
pub const CONFIG_FILE: &str = "config/schedule.toml";

/// Which storage implementation backs the schedule service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Redis,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StorageBackend::Redis),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(config_error(&format!("Unknown storage backend: {}", other))),
        }
    }
}

/// Main configuration structure for the scheduling service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Redis connection string
    pub redis_url: String,
    /// IANA timezone used to place session instants on the wall clock
    pub timezone: String,
    /// Port the schedule API listens on
    pub port: u16,
    /// Storage implementation
    pub storage_backend: StorageBackend,
}

/// Values that may be set in `config/schedule.toml`
#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
    redis_url: Option<String>,
    timezone: Option<String>,
    port: Option<u16>,
    storage_backend: Option<StorageBackend>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: DEFAULT_REDIS_URL.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            port: DEFAULT_PORT,
            storage_backend: StorageBackend::Redis,
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> ScheduleResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let mut config = Config::default();

        if let Ok(redis_url) = env::var("REDIS_URL") {
            config.redis_url = redis_url;
        }

        if let Ok(timezone) = env::var("TIMEZONE") {
            config.timezone = timezone;
        }

        if let Ok(port) = env::var("PORT") {
            config.port = port.parse::<u16>().map_err(|_| env_error("PORT"))?;
        }

        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            config.storage_backend = backend.parse()?;
        }

        // File values win over the environment
        if Path::new(CONFIG_FILE).exists() {
            let content = fs::read_to_string(CONFIG_FILE)?;
            config.apply_overrides(&content)?;
        }

        // Fail early on a bad timezone instead of on the first request
        config.tz()?;

        Ok(config)
    }

    /// Merge TOML overrides into this configuration
    pub fn apply_overrides(&mut self, content: &str) -> ScheduleResult<()> {
        let overrides: FileOverrides = toml::from_str(content)?;

        if let Some(redis_url) = overrides.redis_url {
            self.redis_url = redis_url;
        }
        if let Some(timezone) = overrides.timezone {
            self.timezone = timezone;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(backend) = overrides.storage_backend {
            self.storage_backend = backend;
        }

        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> ScheduleResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Unknown timezone: {}", self.timezone)))
    }
}
