use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::request::DataPeriod;
use crate::contact::{seconds_between, Transmitter};
use crate::predict::OrbitalElements;

/// The satellite under analysis and its downlink transmitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Satellite {
    pub name: String,
    pub norad_id: Option<u64>,
    pub orbit_duration_s: f64,
    pub transmitter: Transmitter,
}

impl Satellite {
    pub fn new(name: impl Into<String>, orbit_duration_s: f64, transmitter: Transmitter) -> Self {
        Self {
            name: name.into(),
            norad_id: None,
            orbit_duration_s,
            transmitter,
        }
    }

    pub fn from_orbit(orbit: &OrbitalElements, transmitter: Transmitter) -> Self {
        Self {
            name: orbit.name.clone(),
            norad_id: Some(orbit.norad_id),
            orbit_duration_s: orbit.orbit_duration_s(),
            transmitter,
        }
    }
}

/// Data that has to come down during `[start, end]` when `data_per_period`
/// bits accrue every data period.
pub fn target_data_bits(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    period: DataPeriod,
    orbit_duration_s: f64,
    data_per_period: f64,
) -> f64 {
    let window_s = seconds_between(start, end);
    window_s / period.seconds(orbit_duration_s, window_s) * data_per_period
}
