use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::analysis::error::AnalysisError;
use crate::catalog::OperatorId;
use crate::config::parse_duration;
use crate::contact::{AntennaId, Transmitter};
use crate::link_budget::FrequencyBand;
use crate::units::{deserialize_data_bits, deserialize_frequency_hz, deserialize_power_dbw};

/// Granularity at which contacts are pooled before scheduling.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Every antenna on its own.
    Antennas,
    /// All antennas of a ground station together.
    #[default]
    GroundStations,
    /// All ground stations of an operator together.
    Operators,
    /// Everything selected together.
    All,
    /// No contacts, only the ground track.
    OrbitOnly,
}

/// Time span the requested data volume refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub enum DataPeriod {
    #[default]
    PerOrbit,
    WholeWindow,
    Every(Duration),
}

impl DataPeriod {
    pub fn seconds(&self, orbit_duration_s: f64, window_s: f64) -> f64 {
        match self {
            DataPeriod::PerOrbit => orbit_duration_s,
            DataPeriod::WholeWindow => window_s,
            DataPeriod::Every(d) => d.num_milliseconds() as f64 / 1000.0,
        }
    }
}

impl FromStr for DataPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "per_orbit" => Ok(DataPeriod::PerOrbit),
            "whole_window" => Ok(DataPeriod::WholeWindow),
            other => {
                let period = parse_duration(other)?;
                if period <= Duration::zero() {
                    return Err(format!("data period must be positive, got '{}'", other));
                }
                Ok(DataPeriod::Every(period))
            }
        }
    }
}

impl TryFrom<String> for DataPeriod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransmitterRequest {
    #[serde(deserialize_with = "deserialize_power_dbw")]
    pub eirp: f64,
    #[serde(deserialize_with = "deserialize_frequency_hz")]
    pub frequency_min: f64,
    #[serde(deserialize_with = "deserialize_frequency_hz")]
    pub frequency_max: f64,
}

impl TransmitterRequest {
    pub fn to_transmitter(&self) -> Transmitter {
        Transmitter {
            eirp_dbw: self.eirp,
            band: FrequencyBand::new(self.frequency_min, self.frequency_max),
        }
    }
}

/// What to analyse: which satellite, when, how much data and with which
/// antennas.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub tle: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub data_period: DataPeriod,
    /// Bits to downlink per data period.
    #[serde(deserialize_with = "deserialize_data_bits")]
    pub data_volume: f64,
    pub transmitter: TransmitterRequest,
    #[serde(default)]
    pub mode: AnalysisMode,
    #[serde(default)]
    pub antennas: Vec<AntennaId>,
    /// Operators to compare in operator mode. Empty means all.
    #[serde(default)]
    pub operators: Vec<OperatorId>,
}

impl AnalysisRequest {
    pub fn from_file(path: &str) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.end <= self.start {
            return Err(AnalysisError::InvalidRequest(format!(
                "window end {} is not after start {}",
                self.end, self.start
            )));
        }
        if self.data_volume <= 0.0 {
            return Err(AnalysisError::InvalidRequest(
                "data volume must be positive".to_string(),
            ));
        }
        if self.transmitter.frequency_min >= self.transmitter.frequency_max {
            return Err(AnalysisError::InvalidRequest(
                "transmitter frequency_min must be below frequency_max".to_string(),
            ));
        }
        Ok(())
    }
}

impl FromStr for AnalysisRequest {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let request: AnalysisRequest = serde_yaml::from_str(s)?;
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(crate) fn request_yaml(extra: &str) -> String {
        format!(
            r#"
tle: |
  ISS (ZARYA)
  1 25544U 98067A   24001.50000000  .00016717  00000-0  30302-3 0  9995
  2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.49815308432596
start: 2024-01-01T12:00:00Z
end: 2024-01-02T12:00:00Z
data_volume: 500 MB
transmitter:
  eirp: 2 W
  frequency_min: 8025 MHz
  frequency_max: 8400 MHz
{extra}
"#
        )
    }

    #[test]
    fn parses_quantities_and_defaults() {
        let request: AnalysisRequest = request_yaml("antennas: [100, 200]").parse().unwrap();
        assert_relative_eq!(request.data_volume, 4.0e9);
        assert_relative_eq!(request.transmitter.eirp, 10.0 * 2f64.log10(), epsilon = 1e-12);
        assert_relative_eq!(request.transmitter.frequency_max, 8.4e9);
        assert_eq!(request.data_period, DataPeriod::PerOrbit);
        assert_eq!(request.mode, AnalysisMode::GroundStations);
        assert_eq!(request.antennas, vec![100, 200]);
        assert!(request.operators.is_empty());
    }

    #[test]
    fn parses_data_periods() {
        let request: AnalysisRequest = request_yaml("data_period: 6h\nmode: operators")
            .parse()
            .unwrap();
        assert_eq!(request.data_period, DataPeriod::Every(Duration::hours(6)));
        assert_eq!(request.mode, AnalysisMode::Operators);

        let request: AnalysisRequest = request_yaml("data_period: whole_window").parse().unwrap();
        assert_eq!(request.data_period, DataPeriod::WholeWindow);
        assert_relative_eq!(request.data_period.seconds(5400.0, 86400.0), 86400.0);

        assert!(request_yaml("data_period: sometimes").parse::<AnalysisRequest>().is_err());
    }

    #[test]
    fn rejects_degenerate_requests() {
        let backwards = request_yaml("").replace("end: 2024-01-02", "end: 2023-12-31");
        assert!(matches!(
            backwards.parse::<AnalysisRequest>(),
            Err(AnalysisError::InvalidRequest(_))
        ));
        let nothing = request_yaml("").replace("500 MB", "0 MB");
        assert!(nothing.parse::<AnalysisRequest>().is_err());
    }

    #[test]
    fn mode_names_round_trip_through_display() {
        assert_eq!(AnalysisMode::OrbitOnly.to_string(), "orbit_only");
        let mode: AnalysisMode = serde_yaml::from_str("ground_stations").unwrap();
        assert_eq!(mode, AnalysisMode::GroundStations);
    }
}
