//! Placeholder polylines for axes whose coordinates are unusable
//!
//! Keeps the map populated while source data is being cleaned up. Paths are
//! seeded, so a given axis always gets the same placeholder.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::config::SyntheticPathConfig;
use crate::model::Coordinate;

/// Random walk of `config.points` points around `config.reference`
///
/// The first point lies within `max_offset / 4` of the reference on each
/// axis; every following step moves at most `0.15 * max_offset` per axis.
pub fn synthetic_path(config: &SyntheticPathConfig, seed: u64) -> Vec<Coordinate> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut jitter = |scale: f64| (rng.random::<f64>() - 0.5) * config.max_offset * scale;

    let mut path = Vec::with_capacity(config.points);
    if config.points == 0 {
        return path;
    }

    let mut lat = config.reference.lat + jitter(0.5);
    let mut lon = config.reference.lon + jitter(0.5);
    path.push(Coordinate::new(lat, lon));

    for _ in 1..config.points {
        lat += jitter(0.3);
        lon += jitter(0.3);
        path.push(Coordinate::new(lat, lon));
    }

    path
}
