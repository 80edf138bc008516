//! Road network components - node keys, nodes and edges

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, TrafficTag};

/// Decimal places kept when deriving a node key (~0.11 m)
pub const NODE_KEY_PRECISION: usize = 6;

/// Identity of a road node: its coordinate rounded to six decimals
///
/// Endpoints of different segments that round to the same key are the same
/// intersection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey(String);

impl NodeKey {
    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        NodeKey(format!(
            "{:.prec$}_{:.prec$}",
            coordinate.lat,
            coordinate.lon,
            prec = NODE_KEY_PRECISION
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Road graph node
#[derive(Debug, Clone, Serialize)]
pub struct RoadNode {
    /// Insertion order, only meaningful within one build
    pub id: usize,
    pub key: NodeKey,
    /// First coordinate seen for this key
    pub coordinate: Coordinate,
}

/// Road graph edge, one per connected node pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoadEdge {
    pub distance_km: f64,
    pub segment_id: i64,
    pub segment_name: String,
    pub traffic: TrafficTag,
}
