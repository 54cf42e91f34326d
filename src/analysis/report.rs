use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::error::AnalysisError;
use crate::analysis::ground_track::TrackPoint;
use crate::analysis::request::AnalysisMode;
use crate::analysis::satellite::Satellite;
use crate::catalog::{Catalog, CatalogError, GroundStationId, OperatorId};
use crate::contact::{AntennaId, Contact, ContactGroup, Link};
use crate::predict::Site;
use crate::units::{data_with_unit, to_percent_max100};

/// Achieved volume compared to the target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeReport {
    pub data_bits: f64,
    pub data_with_unit: String,
    pub share_percentage: f64,
    pub sufficient: bool,
}

impl VolumeReport {
    pub fn new(data_bits: f64, target_bits: f64) -> Self {
        let share = data_bits / target_bits;
        Self {
            data_bits,
            data_with_unit: data_with_unit(data_bits),
            share_percentage: to_percent_max100(share),
            sufficient: share >= 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactReport {
    pub antenna_id: AntennaId,
    pub antenna_name: String,
    pub ground_station_id: GroundStationId,
    pub ground_station_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub data_bits: f64,
    pub data_with_unit: String,
    pub link: Option<Link>,
    /// Part of the winning schedule.
    pub optimal: bool,
}

impl ContactReport {
    pub fn new(contact: &Contact, catalog: &Catalog, optimal: bool) -> Result<Self, AnalysisError> {
        let antenna = catalog
            .antenna(contact.antenna())
            .ok_or(CatalogError::UnknownAntenna(contact.antenna()))?;
        let station_name = catalog
            .ground_station(antenna.ground_station)
            .map(|gs| gs.name.clone())
            .unwrap_or_default();
        let data_bits = contact.data()?;

        Ok(Self {
            antenna_id: antenna.id,
            antenna_name: antenna.name.clone(),
            ground_station_id: antenna.ground_station,
            ground_station_name: station_name,
            start: contact.start_time()?,
            end: contact.end_time()?,
            data_bits,
            data_with_unit: data_with_unit(data_bits),
            link: contact.best_link().cloned(),
            optimal,
        })
    }
}

/// Outcome of scheduling one pool of contacts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolReport {
    #[serde(flatten)]
    pub volume: VolumeReport,
    /// The winning schedule, chronological.
    pub best_sequence: Vec<ContactReport>,
    /// Every contact of the pool.
    pub contacts: Vec<ContactReport>,
    pub groups: Vec<ContactGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AntennaReport {
    pub id: AntennaId,
    pub name: String,
    pub ground_station_id: GroundStationId,
    pub ground_station_name: String,
    #[serde(flatten)]
    pub volume: VolumeReport,
    pub contacts: Vec<ContactReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundStationReport {
    pub id: GroundStationId,
    pub name: String,
    pub coordinates: Option<Site>,
    pub antennas: Vec<AntennaId>,
    #[serde(flatten)]
    pub pool: PoolReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorReport {
    pub id: OperatorId,
    pub name: String,
    /// Selected ground stations run by this operator.
    pub ground_stations: Vec<GroundStationId>,
    #[serde(flatten)]
    pub pool: PoolReport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", content = "results", rename_all = "snake_case")]
pub enum ModeReport {
    Antennas(Vec<AntennaReport>),
    GroundStations(Vec<GroundStationReport>),
    Operators(Vec<OperatorReport>),
    All(PoolReport),
    OrbitOnly,
}

impl ModeReport {
    pub fn mode(&self) -> AnalysisMode {
        match self {
            ModeReport::Antennas(_) => AnalysisMode::Antennas,
            ModeReport::GroundStations(_) => AnalysisMode::GroundStations,
            ModeReport::Operators(_) => AnalysisMode::Operators,
            ModeReport::All(_) => AnalysisMode::All,
            ModeReport::OrbitOnly => AnalysisMode::OrbitOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub satellite: Satellite,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub target_bits: f64,
    pub target_with_unit: String,
    pub result: ModeReport,
    pub ground_track: Vec<TrackPoint>,
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
