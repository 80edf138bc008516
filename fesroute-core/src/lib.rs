//! Client-side road routing for a city axis map
//!
//! Road axes arrive as records with loosely formatted coordinate strings.
//! They are parsed ([`loading::parse_coordinates`]), merged into a road graph
//! whose nodes are coordinates rounded to six decimals
//! ([`model::RoadNetwork::from_segments`]), and queried with a traffic-weighted
//! Dijkstra search between the nodes nearest to two clicked points
//! ([`routing::route`]).
//!
//! ```no_run
//! use fesroute_core::prelude::*;
//!
//! # fn main() -> Result<(), Error> {
//! let config = RoutingConfig::default();
//! let axes = load_axes(std::path::Path::new("axes.json"))?;
//! let network = build_road_network(&axes, &config)?;
//! let query = RouteQuery::new(
//!     Coordinate::new(34.0301, -5.0001),
//!     Coordinate::new(34.0399, -5.0099),
//!     TrafficLevel::Normal,
//! );
//! let result = route(&network, &query, &config)?;
//! println!("{:.2} km, {} min", result.distance_km, result.duration_min);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
