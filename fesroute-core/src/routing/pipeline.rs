use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::assemble::{PathResult, assemble};
use super::dijkstra::shortest_path;
use crate::config::RoutingConfig;
use crate::error::{Endpoint, Error};
use crate::model::{Coordinate, RoadNetwork, TrafficLevel};

/// Route request between two arbitrary points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteQuery {
    #[serde(alias = "startPoint")]
    pub start: Coordinate,
    #[serde(alias = "endPoint")]
    pub end: Coordinate,
    #[serde(default, alias = "trafficLevel")]
    pub traffic_level: TrafficLevel,
}

impl RouteQuery {
    pub fn new(start: Coordinate, end: Coordinate, traffic_level: TrafficLevel) -> Self {
        Self {
            start,
            end,
            traffic_level,
        }
    }
}

/// Computes a route between two points over the road network
///
/// Both points are snapped to their nearest node within
/// `config.max_snap_km`, the nodes are joined with a traffic-weighted
/// shortest path and the exact points are stitched back on.
///
/// # Errors
///
/// [`Error::InvalidData`] when a point is outside the WGS84 range,
/// [`Error::NoNearbyRoad`] when a point is too far from every road,
/// [`Error::Unreachable`] when the snapped nodes are not connected.
pub fn route(
    network: &RoadNetwork,
    query: &RouteQuery,
    config: &RoutingConfig,
) -> Result<PathResult, Error> {
    for (endpoint, point) in [(Endpoint::Start, query.start), (Endpoint::End, query.end)] {
        if !point.is_valid() {
            return Err(Error::InvalidData(format!(
                "{endpoint} point ({}, {}) is outside the valid coordinate range",
                point.lat, point.lon
            )));
        }
    }

    let (source, start_snap) = network
        .nearest_node(&query.start, config.max_snap_km)
        .ok_or(Error::NoNearbyRoad(Endpoint::Start))?;
    let (target, end_snap) = network
        .nearest_node(&query.end, config.max_snap_km)
        .ok_or(Error::NoNearbyRoad(Endpoint::End))?;

    debug!(
        "Routing {} -> {} (snapped {start_snap:.3} km / {end_snap:.3} km), traffic {}",
        source.index(),
        target.index(),
        query.traffic_level
    );

    let solved = shortest_path(network, source, target, query.traffic_level)
        .ok_or(Error::Unreachable)?;

    Ok(assemble(
        query.start,
        query.end,
        &solved,
        network,
        query.traffic_level,
        &config.speed,
    ))
}

/// Runs independent route queries in parallel against one network
pub fn route_many(
    network: &RoadNetwork,
    queries: &[RouteQuery],
    config: &RoutingConfig,
) -> Vec<Result<PathResult, Error>> {
    queries
        .par_iter()
        .map(|query| route(network, query, config))
        .collect()
}
