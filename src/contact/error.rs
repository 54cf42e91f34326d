use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("contact has no relative positions")]
    NoRelativePositions,
    #[error("contact starting {start} does not follow previous contact ending {previous_end}")]
    ChronologicalViolation {
        previous_end: DateTime<Utc>,
        start: DateTime<Utc>,
    },
    #[error("data volume of contact was not computed")]
    DataNotComputed,
    #[error("unexpected horizon event sequence: {0}")]
    MalformedEvents(String),
    #[error("propagation failed: {0}")]
    Propagation(#[from] PredictError),
}
