use thiserror::Error;

use crate::StopId;

#[derive(Error, Debug)]
pub enum Error {
    /// A query referenced a stop id absent from the current stop index.
    /// Distinct from an unreachable destination, which is a normal result.
    #[error("Unknown stop id: {0}")]
    UnknownStop(StopId),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
