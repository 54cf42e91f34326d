use thiserror::Error;

use crate::catalog::types::{GroundStationId, OperatorId};
use crate::contact::AntennaId;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("antenna {0} is unknown or not usable")]
    UnknownAntenna(AntennaId),
    #[error("operator {0} is unknown or has no usable ground station")]
    UnknownOperator(OperatorId),
    #[error("antenna id {0} is used more than once")]
    DuplicateAntenna(AntennaId),
    #[error("ground station id {0} is used more than once")]
    DuplicateGroundStation(GroundStationId),
}
