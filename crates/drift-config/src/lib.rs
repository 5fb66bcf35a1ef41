//! TOML configuration for the snowdrift analysis tools

use drift_core::{AnalysisError, DepthUnit, RiskConfig, SpeedUnit};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const CONFIG_ENV: &str = "SNOWDRIFT_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "snowdrift.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    pub id: Option<String>,
}

/// Units used by the observation feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub depth_unit: DepthUnit,
    pub speed_unit: SpeedUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub station: Option<StationConfig>,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub input: InputConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Invalid(#[from] AnalysisError),
}

impl AppConfig {
    /// Load from the SNOWDRIFT_CONFIG path (TOML) if present, with defaults otherwise
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file yields the defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = if path.exists() {
            let s = fs::read_to_string(path)?;
            Self::parse(&s)?
        } else {
            AppConfig::default()
        };
        Ok(cfg)
    }

    /// Parse and validate TOML text
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let cfg = toml::from_str::<AppConfig>(s)?;
        cfg.risk.validate()?;
        Ok(cfg)
    }

    pub fn station_id(&self) -> Option<&str> {
        self.station.as_ref().and_then(|s| s.id.as_deref())
    }

    /// Directory for period output; `None` means stdout
    pub fn output_dir(&self) -> Option<String> {
        self.output.as_ref().and_then(|o| o.dir.clone())
    }
}
