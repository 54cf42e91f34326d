mod error;
mod event_finder;
mod propagation;
mod site;
mod tle;
mod types;

pub use error::PredictError;
pub use event_finder::find_events;
pub use propagation::{ecef_to_geodetic, observe_from, Propagator, Sgp4Propagator};
pub use site::Site;
pub use tle::{parse_tle_lines, OrbitalElements, SI_DAY_SECONDS};
pub use types::{EventKind, EventSearch, HorizonEvent, Observation, Subpoint, MIN_ELEVATION_DEG};
