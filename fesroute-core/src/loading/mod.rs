//! This module is responsible for loading road axis data, parsing their
//! coordinate strings and building the road network.

mod builder;
pub mod coords;
pub mod records;
pub mod synthetic;

pub use builder::build_road_network;
pub use coords::{CoordinateError, parse_coordinates};
pub use records::{AxisRecord, load_axes, load_axes_csv, load_axes_json, segments_from_records};
pub use synthetic::synthetic_path;
