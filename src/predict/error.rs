use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("invalid tle format: expected 2 or 3 non-empty lines, got {0}")]
    InvalidTleFormat(usize),
    #[error("invalid tle: {0}")]
    InvalidTle(String),
    #[error("propagation error: {0}")]
    Propagation(String),
}
