use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Looked for in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "debris-tracker.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub station: StationConfig,
    pub serial: SerialConfig,
    pub cache: CacheConfig,
    pub tracking: TrackingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    /// Static "lat, lon" observer. When absent the GPS read-back runs.
    pub coordinates: Option<String>,
    /// Used in non-port mode, where no GPS is reachable either.
    pub default_coordinates: String,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            coordinates: None,
            // Cape Canaveral
            default_coordinates: "28.4089, -80.6044".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud: u32,
    #[serde(deserialize_with = "duration_str")]
    pub timeout: Duration,
    /// The controller resets when the port opens; give it time to boot.
    #[serde(deserialize_with = "duration_str")]
    pub settle: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: "/dev/ttyACM0".to_string(),
            baud: 9600,
            timeout: Duration::from_secs(1),
            settle: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: PathBuf,
    /// Fall back to previously cached element files when every remote
    /// source fails.
    pub use_local_fallback: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("tle_cache"),
            use_local_fallback: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    #[serde(deserialize_with = "duration_str")]
    pub tick: Duration,
    pub plot_dir: PathBuf,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(2),
            plot_dir: PathBuf::from("plots"),
        }
    }
}

fn duration_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    humantime::parse_duration(&text).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Reads the default config file when present, built-in defaults
    /// otherwise.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
