//! Parsing of the coordinate strings stored on road axes
//!
//! Axis records carry their polyline as free text. Two conventions occur in
//! the data:
//!
//! - a JSON array of `[lat, lon]` pairs, taken as-is once it parses
//! - a flat list of numbers in `lon, lat` order, wrapped in any mix of
//!   brackets, parentheses and quotes (e.g. a stringified Python list of
//!   tuples)

use itertools::Itertools;
use thiserror::Error;

use crate::model::Coordinate;

/// Fewest points that still describe a polyline
pub const MIN_POLYLINE_POINTS: usize = 2;

const PUNCTUATION: [char; 6] = ['[', ']', '(', ')', '\'', '"'];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("coordinate string is empty")]
    Empty,
    #[error("expected at least {} valid coordinate pairs, found {found}", MIN_POLYLINE_POINTS)]
    TooFewPairs { found: usize },
    #[error("coordinate pair {index} is incomplete or out of range")]
    InvalidPair { index: usize },
}

/// Parses a coordinate string into an ordered `(lat, lon)` polyline
///
/// # Errors
///
/// Returns an error when a JSON pair list holds an invalid pair, or when
/// neither convention yields at least two valid pairs.
pub fn parse_coordinates(raw: &str) -> Result<Vec<Coordinate>, CoordinateError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoordinateError::Empty);
    }

    if let Some(parsed) = parse_json_pairs(raw) {
        return parsed;
    }

    let coordinates = parse_flattened(raw);
    if coordinates.len() >= MIN_POLYLINE_POINTS {
        Ok(coordinates)
    } else {
        Err(CoordinateError::TooFewPairs {
            found: coordinates.len(),
        })
    }
}

/// `[[lat, lon, ..], ...]`; `None` when the input has another shape
fn parse_json_pairs(raw: &str) -> Option<Result<Vec<Coordinate>, CoordinateError>> {
    let pairs: Vec<Vec<f64>> = serde_json::from_str(raw).ok()?;

    let coordinates = pairs
        .iter()
        .enumerate()
        .map(|(index, pair)| match pair.as_slice() {
            [lat, lon, ..] => {
                Coordinate::checked(*lat, *lon).ok_or(CoordinateError::InvalidPair { index })
            }
            _ => Err(CoordinateError::InvalidPair { index }),
        })
        .collect::<Result<Vec<_>, _>>();

    Some(coordinates.and_then(|coordinates| {
        if coordinates.len() >= MIN_POLYLINE_POINTS {
            Ok(coordinates)
        } else {
            Err(CoordinateError::TooFewPairs {
                found: coordinates.len(),
            })
        }
    }))
}

/// Flat `lon, lat, lon, lat, ...` list; output is swapped to `(lat, lon)`
///
/// A trailing unpaired value is dropped, invalid pairs are skipped.
fn parse_flattened(raw: &str) -> Vec<Coordinate> {
    let cleaned: String = raw.chars().filter(|c| !PUNCTUATION.contains(c)).collect();

    cleaned
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .tuples()
        .filter_map(|(lon, lat)| {
            let lon = lon.parse::<f64>().ok()?;
            let lat = lat.parse::<f64>().ok()?;
            Coordinate::checked(lat, lon)
        })
        .collect()
}
