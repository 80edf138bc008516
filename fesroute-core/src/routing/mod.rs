//! Route computation over the road network: shortest path search, route
//! assembly and export.

pub mod assemble;
pub mod dijkstra;
pub mod pipeline;
mod to_geojson;

pub use assemble::{PathResult, RouteLeg, assemble};
pub use dijkstra::{SolvedPath, edge_cost, shortest_path};
pub use pipeline::{RouteQuery, route, route_many};
