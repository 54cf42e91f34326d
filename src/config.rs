use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use thiserror::Error;

use crate::predict::{EventSearch, MIN_ELEVATION_DEG};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Catalog of antennas, ground stations and operators.
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub prediction: PredictionConfig,
    #[serde(default)]
    pub ground_track: GroundTrackConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionConfig {
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f64,
    #[serde(default = "default_coarse_step", deserialize_with = "deserialize_duration")]
    pub coarse_step: Duration,
    #[serde(default = "default_fine_step", deserialize_with = "deserialize_duration")]
    pub fine_step: Duration,
}

fn default_min_elevation() -> f64 {
    MIN_ELEVATION_DEG
}

fn default_coarse_step() -> Duration {
    Duration::seconds(60)
}

fn default_fine_step() -> Duration {
    Duration::seconds(1)
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            min_elevation_deg: default_min_elevation(),
            coarse_step: default_coarse_step(),
            fine_step: default_fine_step(),
        }
    }
}

impl PredictionConfig {
    pub fn event_search(&self) -> EventSearch {
        EventSearch {
            min_elevation_deg: self.min_elevation_deg,
            coarse_step: self.coarse_step,
            fine_step: self.fine_step,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundTrackConfig {
    /// Longer windows get no ground track.
    #[serde(default = "default_max_window", deserialize_with = "deserialize_duration")]
    pub max_window: Duration,
    #[serde(default = "default_steps_per_orbit")]
    pub steps_per_orbit: u32,
}

fn default_max_window() -> Duration {
    Duration::days(90)
}

fn default_steps_per_orbit() -> u32 {
    100
}

impl Default for GroundTrackConfig {
    fn default() -> Self {
        Self {
            max_window: default_max_window(),
            steps_per_orbit: default_steps_per_orbit(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

pub fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}
