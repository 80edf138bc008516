use serde::{Deserialize, Serialize};

use super::dijkstra::SolvedPath;
use crate::config::SpeedModel;
use crate::model::{
    Coordinate, RoadNetwork, TrafficLevel, TrafficTag, haversine_km, polyline_length_km,
};

/// One traversed road edge, oriented in travel direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub from: Coordinate,
    pub to: Coordinate,
    pub distance_km: f64,
    pub segment_id: i64,
    pub segment_name: String,
    pub traffic: TrafficTag,
}

/// A resolved route ready for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// Exact start, graph path, exact end
    pub coordinates: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: u32,
    /// Traffic-weighted cost of the graph part
    pub cost: f64,
    /// Distance between the clicked points and the nodes they snapped to
    pub start_snap_km: f64,
    pub end_snap_km: f64,
    pub traffic_level: TrafficLevel,
    pub legs: Vec<RouteLeg>,
}

/// Stitches the exact query points onto a solved graph path
///
/// The distance covers the whole polyline including the hops from the
/// clicked points to the network. The duration comes from `speed` applied to
/// that distance.
pub fn assemble(
    start: Coordinate,
    end: Coordinate,
    solved: &SolvedPath,
    network: &RoadNetwork,
    level: TrafficLevel,
    speed: &SpeedModel,
) -> PathResult {
    let path = solved.coordinates(network);

    let mut coordinates = Vec::with_capacity(path.len() + 2);
    coordinates.push(start);
    coordinates.extend_from_slice(&path);
    coordinates.push(end);

    let (start_snap_km, end_snap_km) = match (path.first(), path.last()) {
        (Some(&first), Some(&last)) => (haversine_km(start, first), haversine_km(last, end)),
        _ => (0.0, 0.0),
    };
    let distance_km = if path.is_empty() {
        haversine_km(start, end)
    } else {
        start_snap_km + polyline_length_km(&path) + end_snap_km
    };

    let legs = solved
        .nodes
        .windows(2)
        .zip(&solved.edges)
        .filter_map(|(pair, &edge_index)| {
            let edge = network.edge(edge_index)?;
            Some(RouteLeg {
                from: network.node(pair[0])?.coordinate,
                to: network.node(pair[1])?.coordinate,
                distance_km: edge.distance_km,
                segment_id: edge.segment_id,
                segment_name: edge.segment_name.clone(),
                traffic: edge.traffic.clone(),
            })
        })
        .collect();

    PathResult {
        coordinates,
        distance_km,
        duration_min: speed.duration_minutes(distance_km, level),
        cost: solved.cost,
        start_snap_km,
        end_snap_km,
        traffic_level: level,
        legs,
    }
}

impl PathResult {
    /// Distinct axes along the route, in travel order
    pub fn axis_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for leg in &self.legs {
            if names.last() != Some(&leg.segment_name.as_str()) {
                names.push(&leg.segment_name);
            }
        }
        names
    }
}
