use thiserror::Error;

use crate::catalog::CatalogError;
use crate::contact::ContactError;
use crate::predict::PredictError;
use crate::units::UnitError;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
    #[error("contact error: {0}")]
    Contact(#[from] ContactError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("unit error: {0}")]
    Unit(#[from] UnitError),
}
