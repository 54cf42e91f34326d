use crate::analysis::error::AnalysisError;
use crate::analysis::report::{
    AntennaReport, ContactReport, GroundStationReport, OperatorReport, PoolReport, VolumeReport,
};
use crate::catalog::{Antenna, Catalog, GroundStation, Operator};
use crate::contact::{ContactSequence, ContactSet};
use crate::scheduler::best_contact_sequence;
use crate::units::data_with_unit;

/// Contacts of one selected antenna, with volumes computed.
pub struct AntennaContacts<'c> {
    pub antenna: &'c Antenna,
    pub sequence: ContactSequence,
}

/// Selected antennas of one ground station.
pub struct StationContacts<'c> {
    pub station: &'c GroundStation,
    pub antennas: Vec<AntennaContacts<'c>>,
}

impl StationContacts<'_> {
    fn contact_set(&self) -> ContactSet {
        self.antennas
            .iter()
            .flat_map(|a| a.sequence.contacts().iter().cloned())
            .collect()
    }
}

/// Every antenna on its own. No scheduling: the contacts of one antenna
/// never overlap, so each contact carrying data counts as used.
pub fn antennas(
    stations: &[StationContacts],
    catalog: &Catalog,
    target_bits: f64,
) -> Result<Vec<AntennaReport>, AnalysisError> {
    let mut reports = Vec::new();
    for station in stations {
        for entry in &station.antennas {
            let contacts = entry
                .sequence
                .contacts()
                .iter()
                .map(|c| ContactReport::new(c, catalog, c.data()? > 0.0))
                .collect::<Result<Vec<_>, _>>()?;
            let data = entry.sequence.data()?;
            log::info!("antenna {}: {}", entry.antenna.name, data_with_unit(data));
            reports.push(AntennaReport {
                id: entry.antenna.id,
                name: entry.antenna.name.clone(),
                ground_station_id: station.station.id,
                ground_station_name: station.station.name.clone(),
                volume: VolumeReport::new(data, target_bits),
                contacts,
            });
        }
    }
    Ok(reports)
}

/// The antennas of each ground station pooled and scheduled together.
pub fn ground_stations(
    stations: &[StationContacts],
    catalog: &Catalog,
    target_bits: f64,
) -> Result<Vec<GroundStationReport>, AnalysisError> {
    stations
        .iter()
        .map(|station| {
            let pool = schedule_pool(&station.contact_set(), catalog, target_bits)?;
            log::info!(
                "ground station {}: {}",
                station.station.name,
                pool.volume.data_with_unit
            );
            Ok(GroundStationReport {
                id: station.station.id,
                name: station.station.name.clone(),
                coordinates: station.station.display_coordinates(),
                antennas: station.antennas.iter().map(|a| a.antenna.id).collect(),
                pool,
            })
        })
        .collect()
}

/// The selected ground stations of each operator pooled together.
pub fn operators(
    stations: &[StationContacts],
    operators: &[&Operator],
    catalog: &Catalog,
    target_bits: f64,
) -> Result<Vec<OperatorReport>, AnalysisError> {
    operators
        .iter()
        .map(|operator| {
            let members: Vec<&StationContacts> = stations
                .iter()
                .filter(|s| s.station.operators.contains(&operator.id))
                .collect();
            let mut set = ContactSet::new();
            for station in &members {
                for entry in &station.antennas {
                    set.extend(entry.sequence.clone());
                }
            }
            let pool = schedule_pool(&set, catalog, target_bits)?;
            log::info!("operator {}: {}", operator.name, pool.volume.data_with_unit);
            Ok(OperatorReport {
                id: operator.id,
                name: operator.name.clone(),
                ground_stations: members.iter().map(|s| s.station.id).collect(),
                pool,
            })
        })
        .collect()
}

/// Everything selected pooled together.
pub fn all(
    stations: &[StationContacts],
    catalog: &Catalog,
    target_bits: f64,
) -> Result<PoolReport, AnalysisError> {
    let set: ContactSet = stations
        .iter()
        .flat_map(|s| s.antennas.iter())
        .flat_map(|a| a.sequence.contacts().iter().cloned())
        .collect();
    let pool = schedule_pool(&set, catalog, target_bits)?;
    log::info!("all antennas: {}", pool.volume.data_with_unit);
    Ok(pool)
}

fn schedule_pool(
    set: &ContactSet,
    catalog: &Catalog,
    target_bits: f64,
) -> Result<PoolReport, AnalysisError> {
    let schedule = best_contact_sequence(set.contacts())?;

    let best_sequence = schedule
        .sequence
        .contacts()
        .iter()
        .map(|c| ContactReport::new(c, catalog, true))
        .collect::<Result<Vec<_>, _>>()?;
    let contacts = set
        .contacts()
        .iter()
        .enumerate()
        .map(|(i, c)| ContactReport::new(c, catalog, schedule.is_optimal(i)))
        .collect::<Result<Vec<_>, _>>()?;
    let groups = set.groups(|i| schedule.is_optimal(i))?;

    Ok(PoolReport {
        volume: VolumeReport::new(schedule.data(), target_bits),
        best_sequence,
        contacts,
        groups,
    })
}
