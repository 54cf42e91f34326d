use chrono::{DateTime, Utc};

use crate::predict::error::PredictError;
use crate::predict::event_finder;
use crate::predict::site::{Site, WGS84_A_KM, WGS84_E2};
use crate::predict::tle::OrbitalElements;
use crate::predict::types::{EventSearch, HorizonEvent, Observation, Subpoint};

/// Source of satellite positions over time.
pub trait Propagator {
    /// Satellite seen from `site` at `time`.
    fn observe(&self, site: &Site, time: DateTime<Utc>) -> Result<Observation, PredictError>;

    /// Sub-satellite point at `time`.
    fn subpoint(&self, time: DateTime<Utc>) -> Result<Subpoint, PredictError>;

    /// Chronological rise/culminate/set events over `[start, end]`.
    fn find_events(
        &self,
        site: &Site,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        search: &EventSearch,
    ) -> Result<Vec<HorizonEvent>, PredictError> {
        event_finder::find_events(self, site, start, end, search)
    }
}

/// SGP4 propagation of a two-line element set.
pub struct Sgp4Propagator {
    orbit: OrbitalElements,
}

impl Sgp4Propagator {
    pub fn new(orbit: OrbitalElements) -> Self {
        Self { orbit }
    }

    pub fn from_tle(tle: &str) -> Result<Self, PredictError> {
        Ok(Self::new(OrbitalElements::from_tle(tle)?))
    }

    pub fn orbit(&self) -> &OrbitalElements {
        &self.orbit
    }

    /// Satellite position in ECEF (km).
    fn position_ecef_km(&self, time: DateTime<Utc>) -> Result<[f64; 3], PredictError> {
        let minutes = self
            .orbit
            .elements
            .datetime_to_minutes_since_epoch(&time.naive_utc())
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let prediction = self
            .orbit
            .constants
            .propagate(minutes)
            .map_err(|e| PredictError::Propagation(e.to_string()))?;

        let sidereal =
            sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&time.naive_utc()));

        Ok(teme_to_ecef_position(prediction.position, sidereal))
    }
}

impl Propagator for Sgp4Propagator {
    fn observe(&self, site: &Site, time: DateTime<Utc>) -> Result<Observation, PredictError> {
        let sat_ecef = self.position_ecef_km(time)?;
        Ok(observe_from(site, sat_ecef, time))
    }

    fn subpoint(&self, time: DateTime<Utc>) -> Result<Subpoint, PredictError> {
        Ok(ecef_to_geodetic(self.position_ecef_km(time)?))
    }
}

/// Look angles and range from `site` to a satellite at `sat_ecef` (km).
pub fn observe_from(site: &Site, sat_ecef: [f64; 3], time: DateTime<Utc>) -> Observation {
    let sta_ecef = site.position_ecef_km();
    let dr = [
        sat_ecef[0] - sta_ecef[0],
        sat_ecef[1] - sta_ecef[1],
        sat_ecef[2] - sta_ecef[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();

    let enu = ecef_to_enu(dr, site.lat_rad(), site.lon_rad());
    let azimuth_deg = enu.0.atan2(enu.1).to_degrees().rem_euclid(360.0);
    let elevation_deg = if range_km > 0.0 {
        (enu.2 / range_km).asin().to_degrees()
    } else {
        90.0
    };

    Observation {
        time,
        range_m: range_km * 1000.0,
        azimuth_deg,
        elevation_deg,
        subpoint: ecef_to_geodetic(sat_ecef),
    }
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// WGS-84 geodetic coordinates of an ECEF position (km), by fixed-point
/// iteration on the latitude.
pub fn ecef_to_geodetic(pos_km: [f64; 3]) -> Subpoint {
    let [x, y, z] = pos_km;
    let p = (x * x + y * y).sqrt();
    let longitude_rad = y.atan2(x);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    let mut n = WGS84_A_KM;
    for _ in 0..8 {
        let sin_lat = lat.sin();
        n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
        lat = (z + WGS84_E2 * n * sin_lat).atan2(p);
    }

    let altitude_km = if lat.cos().abs() > 1e-9 {
        p / lat.cos() - n
    } else {
        z.abs() - n * (1.0 - WGS84_E2)
    };

    Subpoint {
        latitude_rad: lat,
        longitude_rad,
        altitude_m: altitude_km * 1000.0,
    }
}
