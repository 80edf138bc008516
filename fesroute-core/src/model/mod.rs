//! Data model for road network routing
//!
//! Contains coordinates, traffic information, road segments and the graph
//! built from them.

pub mod coordinate;
pub mod network;
pub mod segment;
pub mod traffic;

pub use coordinate::{Coordinate, EARTH_RADIUS_KM, haversine_km, polyline_length_km};
pub use network::{NodeKey, RoadEdge, RoadNetwork, RoadNode};
pub use segment::RoadSegment;
pub use traffic::{Congestion, TrafficLevel, TrafficTag, congestion_class, traffic_factor};
