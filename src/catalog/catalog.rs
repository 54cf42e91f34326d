use std::collections::HashSet;
use std::str::FromStr;

use crate::catalog::error::CatalogError;
use crate::catalog::types::{
    Antenna, CatalogFile, GroundStation, GroundStationId, Operator, OperatorId,
};
use crate::contact::AntennaId;

/// Usable infrastructure only: stations without a usable antenna and
/// operators without a usable station are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    operators: Vec<Operator>,
    ground_stations: Vec<GroundStation>,
}

impl Catalog {
    pub fn from_file(path: &str) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    pub fn from_records(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut antenna_ids = HashSet::new();
        let mut station_ids = HashSet::new();
        let mut ground_stations = Vec::new();

        for record in file.ground_stations {
            if !station_ids.insert(record.id) {
                return Err(CatalogError::DuplicateGroundStation(record.id));
            }
            let mut antennas = Vec::new();
            for antenna in &record.antennas {
                if !antenna_ids.insert(antenna.id) {
                    return Err(CatalogError::DuplicateAntenna(antenna.id));
                }
                match antenna.to_antenna(record.id) {
                    Some(usable) => antennas.push(usable),
                    None => log::warn!(
                        "skipping antenna {} of {}: incomplete or not operational",
                        antenna.id,
                        record.name
                    ),
                }
            }
            if antennas.is_empty() {
                log::debug!("ground station {} has no usable antenna", record.name);
                continue;
            }
            antennas.sort_by(|a, b| a.name.cmp(&b.name));
            ground_stations.push(GroundStation {
                id: record.id,
                name: record.name,
                operators: record.operators,
                antennas,
            });
        }

        let mut operators: Vec<Operator> = file
            .operators
            .into_iter()
            .filter(|op| ground_stations.iter().any(|gs| gs.operators.contains(&op.id)))
            .map(|op| Operator {
                id: op.id,
                name: op.name,
            })
            .collect();
        operators.sort_by(|a, b| a.name.cmp(&b.name));

        log::info!(
            "catalog: {} operators, {} ground stations, {} antennas",
            operators.len(),
            ground_stations.len(),
            ground_stations.iter().map(|gs| gs.antennas.len()).sum::<usize>()
        );

        Ok(Self {
            operators,
            ground_stations,
        })
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn ground_stations(&self) -> &[GroundStation] {
        &self.ground_stations
    }

    pub fn antennas(&self) -> impl Iterator<Item = &Antenna> {
        self.ground_stations.iter().flat_map(|gs| gs.antennas.iter())
    }

    pub fn antenna(&self, id: AntennaId) -> Option<&Antenna> {
        self.antennas().find(|a| a.id == id)
    }

    pub fn ground_station(&self, id: GroundStationId) -> Option<&GroundStation> {
        self.ground_stations.iter().find(|gs| gs.id == id)
    }

    pub fn operator(&self, id: OperatorId) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == id)
    }

    /// Ground stations run by `operator`.
    pub fn ground_stations_of(&self, operator: OperatorId) -> impl Iterator<Item = &GroundStation> {
        self.ground_stations
            .iter()
            .filter(move |gs| gs.operators.contains(&operator))
    }

    /// Looks up antennas by id, in the requested order without duplicates.
    pub fn select_antennas(&self, ids: &[AntennaId]) -> Result<Vec<&Antenna>, CatalogError> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .map(|&id| self.antenna(id).ok_or(CatalogError::UnknownAntenna(id)))
            .collect()
    }

    pub fn select_operators(&self, ids: &[OperatorId]) -> Result<Vec<&Operator>, CatalogError> {
        let mut seen = HashSet::new();
        ids.iter()
            .filter(|id| seen.insert(**id))
            .map(|&id| self.operator(id).ok_or(CatalogError::UnknownOperator(id)))
            .collect()
    }
}

impl FromStr for Catalog {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let file: CatalogFile = serde_yaml::from_str(s)?;
        Self::from_records(file)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const CATALOG_YAML: &str = r#"
operators:
  - id: 1
    name: Northern Network
  - id: 2
    name: Southern Network
  - id: 3
    name: Paper Network
ground_stations:
  - id: 10
    name: Svalbard
    operators: [1]
    antennas:
      - id: 101
        name: SG-2
        latitude: 78.23
        longitude: 15.39
        altitude: 500
        gt_dbw_k: 30.0
        links:
          - frequency_min_mhz: 8025
            frequency_max_mhz: 8400
            downlink: true
      - id: 100
        name: SG-1
        latitude: 78.22
        longitude: 15.40
        altitude: 480
        gt_dbw_k: 25.0
        links:
          - frequency_min_mhz: 2025
            frequency_max_mhz: 2110
            downlink: false
          - frequency_min_mhz: 8025
            frequency_max_mhz: 8400
            downlink: true
      - id: 102
        name: SG-3
        latitude: 78.22
        longitude: 15.40
        altitude: 480
        gt_dbw_k: 25.0
        operational: false
        links:
          - frequency_min_mhz: 8025
            frequency_max_mhz: 8400
            downlink: true
  - id: 20
    name: Weilheim
    operators: [1, 2]
    antennas:
      - id: 200
        name: WHM
        latitude: 47.88
        longitude: 11.08
        altitude: 660
        gt_dbw_k: 32.0
        eirp_dbw: 70.0
        diameter_m: 15.0
        polarisation: RHCP
        links:
          - frequency_min_mhz: 8000
            frequency_max_mhz: 8500
            downlink: true
  - id: 30
    name: Drawing Board
    operators: [3]
    antennas:
      - id: 300
        name: Sketch
        latitude: 0.0
"#;

    fn catalog() -> Catalog {
        CATALOG_YAML.parse().unwrap()
    }

    #[test]
    fn keeps_usable_infrastructure_only() {
        let catalog = catalog();
        assert_eq!(catalog.ground_stations().len(), 2);
        assert_eq!(catalog.antennas().count(), 3);
        assert!(catalog.antenna(102).is_none());
        assert!(catalog.antenna(300).is_none());
        let names: Vec<_> = catalog.operators().iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names, vec!["Northern Network", "Southern Network"]);
    }

    #[test]
    fn hardware_details_are_ignored() {
        let catalog = catalog();
        let whm = catalog.antenna(200).unwrap();
        assert_eq!(whm.name, "WHM");
        assert_eq!(whm.gain_to_noise_temperature, 32.0);
    }

    #[test]
    fn antennas_of_a_station_are_ordered_by_name() {
        let catalog = catalog();
        let station = catalog.ground_station(10).unwrap();
        let ids: Vec<_> = station.antennas.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![100, 101]);
    }

    #[test]
    fn operators_share_stations() {
        let catalog = catalog();
        let northern: Vec<_> = catalog.ground_stations_of(1).map(|gs| gs.id).collect();
        let southern: Vec<_> = catalog.ground_stations_of(2).map(|gs| gs.id).collect();
        assert_eq!(northern, vec![10, 20]);
        assert_eq!(southern, vec![20]);
    }

    #[test]
    fn selecting_unknown_ids_fails() {
        let catalog = catalog();
        let picked = catalog.select_antennas(&[200, 100, 200]).unwrap();
        assert_eq!(picked.iter().map(|a| a.id).collect::<Vec<_>>(), vec![200, 100]);
        assert!(matches!(
            catalog.select_antennas(&[102]),
            Err(CatalogError::UnknownAntenna(102))
        ));
        assert!(matches!(
            catalog.select_operators(&[3]),
            Err(CatalogError::UnknownOperator(3))
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = r#"
ground_stations:
  - id: 1
    name: A
    antennas:
      - id: 5
  - id: 2
    name: B
    antennas:
      - id: 5
"#;
        assert!(matches!(
            yaml.parse::<Catalog>(),
            Err(CatalogError::DuplicateAntenna(5))
        ));
    }
}
