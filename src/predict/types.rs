use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Kind of horizon event, in the order they occur during a full pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    Rise,
    Culminate,
    Set,
}

/// Satellite crossing the elevation threshold upwards (rise), reaching its
/// highest point (culminate) or crossing it downwards (set).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HorizonEvent {
    pub kind: EventKind,
    pub time: DateTime<Utc>,
}

impl HorizonEvent {
    pub fn new(kind: EventKind, time: DateTime<Utc>) -> Self {
        Self { kind, time }
    }
}

/// Point on the ground directly below the satellite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Subpoint {
    pub latitude_rad: f64,
    pub longitude_rad: f64,
    pub altitude_m: f64,
}

/// Satellite as seen from one site at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub range_m: f64,
    pub azimuth_deg: f64,
    pub elevation_deg: f64,
    pub subpoint: Subpoint,
}

/// Parameters of the horizon-event search.
#[derive(Debug, Clone, Copy)]
pub struct EventSearch {
    pub min_elevation_deg: f64,
    pub coarse_step: Duration,
    pub fine_step: Duration,
}

/// Minimum elevation for a satellite to count as visible.
pub const MIN_ELEVATION_DEG: f64 = 5.0;

impl Default for EventSearch {
    fn default() -> Self {
        Self {
            min_elevation_deg: MIN_ELEVATION_DEG,
            coarse_step: Duration::seconds(60),
            fine_step: Duration::seconds(1),
        }
    }
}
