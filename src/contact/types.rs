use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::link_budget::FrequencyBand;
use crate::predict::Observation;

pub type AntennaId = u32;

/// One radio band an antenna can work in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub band: FrequencyBand,
    pub downlink: bool,
}

/// Downlink side of the satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transmitter {
    pub eirp_dbw: f64,
    pub band: FrequencyBand,
}

/// Satellite relative to an antenna at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RelativePosition {
    pub time: DateTime<Utc>,
    pub distance_m: f64,
    pub latitude_rad: f64,
    pub longitude_rad: f64,
    pub altitude_m: f64,
    /// Rate on the contact's chosen link, once computed.
    pub data_rate_bps: Option<u64>,
}

impl From<Observation> for RelativePosition {
    fn from(obs: Observation) -> Self {
        Self {
            time: obs.time,
            distance_m: obs.range_m,
            latitude_rad: obs.subpoint.latitude_rad,
            longitude_rad: obs.subpoint.longitude_rad,
            altitude_m: obs.subpoint.altitude_m,
            data_rate_bps: None,
        }
    }
}

/// Transmittable data of a contact.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DataVolume {
    #[default]
    NotComputed,
    Computed {
        bits: f64,
        link: Option<Link>,
    },
}
