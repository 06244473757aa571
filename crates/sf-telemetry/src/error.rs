use sf_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("topology has no neighborhoods to sample")]
    NoNeighborhoods,
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
