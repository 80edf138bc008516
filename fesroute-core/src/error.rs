use std::fmt;

use thiserror::Error;

use crate::loading::CoordinateError;

/// Which end of a route query failed to snap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("No route near the selected {0} point")]
    NoNearbyRoad(Endpoint),
    #[error("No route between these points")]
    Unreachable,
    #[error("Invalid coordinates for segment {id}: {source}")]
    InvalidSegment {
        id: i64,
        #[source]
        source: CoordinateError,
    },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

impl Error {
    /// Errors scoped to a single query, as opposed to data or I/O failures
    pub fn is_query_error(&self) -> bool {
        matches!(self, Error::NoNearbyRoad(_) | Error::Unreachable)
    }
}
