use serde::{Deserialize, Serialize};

use crate::contact::{AntennaId, Link};
use crate::link_budget::FrequencyBand;
use crate::predict::Site;

pub type GroundStationId = u32;
pub type OperatorId = u32;

const MEGA: f64 = 1e6;

/// Catalog file as stored on disk. Antenna and link fields may be missing;
/// such entries are left out of the [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub operators: Vec<OperatorRecord>,
    #[serde(default)]
    pub ground_stations: Vec<GroundStationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatorRecord {
    pub id: OperatorId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GroundStationRecord {
    pub id: GroundStationId,
    pub name: String,
    #[serde(default)]
    pub operators: Vec<OperatorId>,
    #[serde(default)]
    pub antennas: Vec<AntennaRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AntennaRecord {
    pub id: AntennaId,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Metres above the ellipsoid.
    pub altitude: Option<f64>,
    /// Gain-to-noise-temperature in dB/K.
    pub gt_dbw_k: Option<f64>,
    pub operational: Option<bool>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkRecord {
    pub frequency_min_mhz: Option<f64>,
    pub frequency_max_mhz: Option<f64>,
    pub downlink: Option<bool>,
}

impl LinkRecord {
    pub fn to_link(&self) -> Option<Link> {
        Some(Link {
            band: FrequencyBand::new(
                self.frequency_min_mhz? * MEGA,
                self.frequency_max_mhz? * MEGA,
            ),
            downlink: self.downlink?,
        })
    }
}

impl AntennaRecord {
    /// Usable antennas have a name, a position, a G/T, at least one
    /// complete link and are not marked out of operation.
    pub fn to_antenna(&self, ground_station: GroundStationId) -> Option<Antenna> {
        if self.operational == Some(false) {
            return None;
        }
        let links: Vec<Link> = self.links.iter().filter_map(LinkRecord::to_link).collect();
        if links.is_empty() {
            return None;
        }
        Some(Antenna {
            id: self.id,
            name: self.name.clone()?,
            ground_station,
            site: Site::new(self.latitude?, self.longitude?, self.altitude?),
            gain_to_noise_temperature: self.gt_dbw_k?,
            links,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operator {
    pub id: OperatorId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Antenna {
    pub id: AntennaId,
    pub name: String,
    pub ground_station: GroundStationId,
    pub site: Site,
    pub gain_to_noise_temperature: f64,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundStation {
    pub id: GroundStationId,
    pub name: String,
    pub operators: Vec<OperatorId>,
    /// Usable antennas, ordered by name.
    pub antennas: Vec<Antenna>,
}

impl GroundStation {
    /// Mean position of the antennas, for putting the station on a map.
    pub fn display_coordinates(&self) -> Option<Site> {
        if self.antennas.is_empty() {
            return None;
        }
        let n = self.antennas.len() as f64;
        let (lat, lon, alt) = self.antennas.iter().fold((0.0, 0.0, 0.0), |acc, a| {
            (
                acc.0 + a.site.latitude_deg,
                acc.1 + a.site.longitude_deg,
                acc.2 + a.site.altitude_m,
            )
        });
        Some(Site::new(lat / n, lon / n, alt / n))
    }
}
