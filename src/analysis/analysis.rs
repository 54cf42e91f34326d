use chrono::{DateTime, Utc};

use crate::analysis::error::AnalysisError;
use crate::analysis::ground_track::ground_track;
use crate::analysis::modes::{self, AntennaContacts, StationContacts};
use crate::analysis::report::{AnalysisReport, ModeReport};
use crate::analysis::request::{AnalysisMode, AnalysisRequest, DataPeriod};
use crate::analysis::satellite::{target_data_bits, Satellite};
use crate::catalog::{Catalog, CatalogError, OperatorId};
use crate::config::{Config, GroundTrackConfig};
use crate::contact::{AntennaId, ContactBuilder};
use crate::predict::{EventSearch, Propagator, Sgp4Propagator};
use crate::units::data_with_unit;

/// One analysis window of one satellite.
pub struct Analysis<'a, P: Propagator + ?Sized> {
    propagator: &'a P,
    satellite: Satellite,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    target_bits: f64,
    search: EventSearch,
    ground_track: GroundTrackConfig,
}

impl<'a, P: Propagator + ?Sized> Analysis<'a, P> {
    pub fn new(
        propagator: &'a P,
        satellite: Satellite,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        data_period: DataPeriod,
        data_per_period: f64,
    ) -> Self {
        let target_bits = target_data_bits(
            start,
            end,
            data_period,
            satellite.orbit_duration_s,
            data_per_period,
        );
        Self {
            propagator,
            satellite,
            start,
            end,
            target_bits,
            search: EventSearch::default(),
            ground_track: GroundTrackConfig::default(),
        }
    }

    pub fn with_event_search(mut self, search: EventSearch) -> Self {
        self.search = search;
        self
    }

    pub fn with_ground_track(mut self, config: GroundTrackConfig) -> Self {
        self.ground_track = config;
        self
    }

    pub fn satellite(&self) -> &Satellite {
        &self.satellite
    }

    pub fn target_bits(&self) -> f64 {
        self.target_bits
    }

    /// Runs `mode` over the selected antennas. Without any antenna only the
    /// ground track is computed. In operator mode an empty `operators`
    /// list compares every operator of the catalog.
    pub fn run(
        &self,
        catalog: &Catalog,
        antennas: &[AntennaId],
        operators: &[OperatorId],
        mode: AnalysisMode,
    ) -> Result<AnalysisReport, AnalysisError> {
        let mode = if antennas.is_empty() {
            if mode != AnalysisMode::OrbitOnly {
                log::info!("no antennas selected, computing the orbit only");
            }
            AnalysisMode::OrbitOnly
        } else {
            mode
        };
        log::info!(
            "analysing {} from {} to {} in {} mode, target {}",
            self.satellite.name,
            self.start,
            self.end,
            mode,
            data_with_unit(self.target_bits)
        );

        let target = self.target_bits;
        let result = match mode {
            AnalysisMode::OrbitOnly => ModeReport::OrbitOnly,
            AnalysisMode::Antennas => {
                let stations = self.determine_contacts(catalog, antennas)?;
                ModeReport::Antennas(modes::antennas(&stations, catalog, target)?)
            }
            AnalysisMode::GroundStations => {
                let stations = self.determine_contacts(catalog, antennas)?;
                ModeReport::GroundStations(modes::ground_stations(&stations, catalog, target)?)
            }
            AnalysisMode::Operators => {
                let operators = if operators.is_empty() {
                    catalog.operators().iter().collect()
                } else {
                    catalog.select_operators(operators)?
                };
                let stations = self.determine_contacts(catalog, antennas)?;
                ModeReport::Operators(modes::operators(&stations, &operators, catalog, target)?)
            }
            AnalysisMode::All => {
                let stations = self.determine_contacts(catalog, antennas)?;
                ModeReport::All(modes::all(&stations, catalog, target)?)
            }
        };

        log::info!("{} results ready", result.mode());

        let ground_track = ground_track(
            self.propagator,
            self.start,
            self.end,
            self.satellite.orbit_duration_s,
            &self.ground_track,
        )?;

        Ok(AnalysisReport {
            satellite: self.satellite.clone(),
            start: self.start,
            end: self.end,
            target_bits: self.target_bits,
            target_with_unit: data_with_unit(self.target_bits),
            result,
            ground_track,
        })
    }

    /// Contacts and volumes of every selected antenna, grouped by ground
    /// station in order of first selection.
    fn determine_contacts<'c>(
        &self,
        catalog: &'c Catalog,
        antennas: &[AntennaId],
    ) -> Result<Vec<StationContacts<'c>>, AnalysisError> {
        let builder = ContactBuilder::new(self.propagator, self.search);
        let mut stations: Vec<StationContacts<'c>> = Vec::new();

        for antenna in catalog.select_antennas(antennas)? {
            let station = catalog
                .ground_station(antenna.ground_station)
                .ok_or(CatalogError::UnknownAntenna(antenna.id))?;

            let mut sequence = builder.build(antenna.id, &antenna.site, self.start, self.end)?;
            sequence.determine_data(
                &self.satellite.transmitter,
                antenna.gain_to_noise_temperature,
                &antenna.links,
            );
            log::info!(
                "antenna {} ({}): {} contacts",
                antenna.name,
                station.name,
                sequence.len()
            );

            let entry = AntennaContacts { antenna, sequence };
            match stations.iter_mut().find(|s| s.station.id == station.id) {
                Some(existing) => existing.antennas.push(entry),
                None => stations.push(StationContacts {
                    station,
                    antennas: vec![entry],
                }),
            }
        }
        Ok(stations)
    }
}

/// Runs a request against the SGP4 propagation of its element set.
pub fn analyze(
    request: &AnalysisRequest,
    catalog: &Catalog,
    config: &Config,
) -> Result<AnalysisReport, AnalysisError> {
    request.validate()?;
    let propagator = Sgp4Propagator::from_tle(&request.tle)?;
    let satellite = Satellite::from_orbit(propagator.orbit(), request.transmitter.to_transmitter());

    Analysis::new(
        &propagator,
        satellite,
        request.start,
        request.end,
        request.data_period,
        request.data_volume,
    )
    .with_event_search(config.prediction.event_search())
    .with_ground_track(config.ground_track.clone())
    .run(catalog, &request.antennas, &request.operators, request.mode)
}
