//! Road network model

pub mod components;
#[allow(clippy::module_inception)]
pub mod network;

pub use components::{NODE_KEY_PRECISION, NodeKey, RoadEdge, RoadNode};
pub use network::{IndexedNode, RoadNetwork};
