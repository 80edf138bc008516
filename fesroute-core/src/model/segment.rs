use serde::{Deserialize, Serialize};

use super::{Coordinate, TrafficTag};

/// Road axis with a parsed polyline, the unit the network is built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    pub id: i64,
    pub name: String,
    /// Display-only place names
    pub from_place: String,
    pub to_place: String,
    pub coordinates: Vec<Coordinate>,
    pub traffic: TrafficTag,
}

impl RoadSegment {
    pub fn new(id: i64, name: impl Into<String>, coordinates: Vec<Coordinate>) -> Self {
        Self {
            id,
            name: name.into(),
            from_place: String::new(),
            to_place: String::new(),
            coordinates,
            traffic: TrafficTag::Unspecified,
        }
    }

    #[must_use]
    pub fn with_traffic(mut self, traffic: TrafficTag) -> Self {
        self.traffic = traffic;
        self
    }

    /// A segment needs at least two points to contribute an edge
    pub fn is_degenerate(&self) -> bool {
        self.coordinates.len() < 2
    }
}
