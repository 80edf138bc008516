// Re-export key components
pub use crate::config::{FallbackPolicy, RoutingConfig, SpeedModel, SyntheticPathConfig};
pub use crate::error::{Endpoint, Error};
pub use crate::loading::{
    AxisRecord, build_road_network, load_axes, parse_coordinates, segments_from_records,
};
pub use crate::routing::{PathResult, RouteLeg, RouteQuery, route, route_many};

// Core types for the road network
pub use crate::model::{
    Congestion, Coordinate, NodeKey, RoadEdge, RoadNetwork, RoadNode, RoadSegment, TrafficLevel,
    TrafficTag, congestion_class, haversine_km,
};
