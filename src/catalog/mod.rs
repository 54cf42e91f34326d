//! Read-only snapshot of the antennas, ground stations and operators an
//! analysis can use.

mod catalog;
mod error;
mod types;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use types::{
    Antenna, AntennaRecord, CatalogFile, GroundStation, GroundStationId, GroundStationRecord,
    LinkRecord, Operator, OperatorId, OperatorRecord,
};
