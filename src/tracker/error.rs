use thiserror::Error;

use crate::predict::PredictError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracker already running")]
    AlreadyRunning,
    #[error("invalid tle format")]
    InvalidTleFormat,
    #[error("invalid tle: {0}")]
    InvalidTle(#[from] sgp4::TleError),
    #[error("predict error: {0}")]
    Predict(#[from] PredictError),
}
