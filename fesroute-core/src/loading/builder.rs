use itertools::Itertools;
use log::{debug, info, trace};
use petgraph::graph::NodeIndex;

use super::records::{AxisRecord, segments_from_records};
use crate::config::RoutingConfig;
use crate::error::Error;
use crate::model::{
    Coordinate, NodeKey, RoadEdge, RoadNetwork, RoadNode, RoadSegment, haversine_km,
};

impl RoadNetwork {
    /// Builds the road graph from an ordered snapshot of segments
    ///
    /// Consecutive points of each polyline become edges. Endpoints that round
    /// to the same [`NodeKey`] are merged, so axes sharing an intersection are
    /// connected. A node pair gets at most one edge, owned by the first
    /// segment that connects it. Segments with fewer than two points are
    /// skipped.
    pub fn from_segments(segments: &[RoadSegment]) -> Self {
        let mut network = RoadNetwork::default();
        let mut skipped = 0usize;
        let mut duplicates = 0usize;

        for segment in segments {
            if segment.is_degenerate() {
                debug!(
                    "Skipping segment {} ({}): fewer than two points",
                    segment.id, segment.name
                );
                skipped += 1;
                continue;
            }

            for (from, to) in segment.coordinates.iter().tuple_windows() {
                let a = network.insert_node(from);
                let b = network.insert_node(to);
                if a == b {
                    trace!("Segment {}: consecutive points collapse to one node", segment.id);
                    continue;
                }

                if network.graph.find_edge(a, b).is_some() {
                    duplicates += 1;
                    continue;
                }

                network.graph.add_edge(
                    a,
                    b,
                    RoadEdge {
                        distance_km: haversine_km(*from, *to),
                        segment_id: segment.id,
                        segment_name: segment.name.clone(),
                        traffic: segment.traffic.clone(),
                    },
                );
            }
        }

        network.rebuild_spatial_index();

        info!(
            "Built road network with {} nodes and {} edges from {} segments",
            network.node_count(),
            network.edge_count(),
            segments.len()
        );
        if skipped > 0 || duplicates > 0 {
            debug!("Skipped {skipped} degenerate segments and {duplicates} duplicate edges");
        }

        network
    }

    fn insert_node(&mut self, coordinate: &Coordinate) -> NodeIndex {
        let key = NodeKey::from_coordinate(coordinate);
        if let Some(&index) = self.node_index.get(&key) {
            return index;
        }
        let index = self.graph.add_node(RoadNode {
            id: self.graph.node_count(),
            key: key.clone(),
            coordinate: *coordinate,
        });
        self.node_index.insert(key, index);
        index
    }
}

/// Parses raw axis records and builds the road network from them
///
/// # Errors
///
/// Only under [`crate::config::FallbackPolicy::Strict`], when a record has
/// unusable coordinates.
pub fn build_road_network(
    records: &[AxisRecord],
    config: &RoutingConfig,
) -> Result<RoadNetwork, Error> {
    let segments = segments_from_records(records, config)?;
    Ok(RoadNetwork::from_segments(&segments))
}
