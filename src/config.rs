use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1";

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PantryConfig {
    /// TheMealDB API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Quiet period after the last keystroke before a search runs
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Number of recent searches kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Number of random recipes shown on a first visit
    #[serde(default = "default_random_count")]
    pub random_count: usize,
    /// JSON file holding favorites, history and the last query
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for PantryConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            timeout: default_timeout(),
            history_limit: default_history_limit(),
            random_count: default_random_count(),
            store_path: default_store_path(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_debounce_ms() -> u64 {
    350
}

fn default_timeout() -> u64 {
    30
}

fn default_history_limit() -> usize {
    5
}

fn default_random_count() -> usize {
    6
}

fn default_store_path() -> PathBuf {
    PathBuf::from(".pantry.json")
}

impl PantryConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. pantry.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__DEBOUNCE_MS
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

/// Load configuration from `pantry.toml` and `PANTRY__*` environment variables
pub fn load_config() -> Result<PantryConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("pantry").required(false))
        .add_source(
            Environment::with_prefix("PANTRY")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
