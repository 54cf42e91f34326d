//! Best achievable downlink volume for a satellite over a window, per
//! antenna, ground station, operator or for everything at once.

mod analysis;
mod error;
mod ground_track;
mod modes;
mod report;
mod request;
mod satellite;

pub use analysis::{analyze, Analysis};
pub use error::AnalysisError;
pub use ground_track::{ground_track, TrackPoint};
pub use report::{
    AnalysisReport, AntennaReport, ContactReport, GroundStationReport, ModeReport, OperatorReport,
    PoolReport, VolumeReport,
};
pub use request::{AnalysisMode, AnalysisRequest, DataPeriod, TransmitterRequest};
pub use satellite::{target_data_bits, Satellite};
