//! Road network graph with a spatial index over its nodes

use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use super::components::{NodeKey, RoadEdge, RoadNode};
use crate::model::{Coordinate, haversine_km};

/// Node position in `[lat, lon]` degrees tagged with its graph index
pub type IndexedNode = GeomWithData<[f64; 2], NodeIndex>;

const KM_PER_DEGREE: f64 = std::f64::consts::PI * crate::model::EARTH_RADIUS_KM / 180.0;

/// Undirected road graph built from one snapshot of road segments
///
/// Read-only once built: every query borrows it, so one network can serve
/// any number of concurrent queries.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub(crate) graph: UnGraph<RoadNode, RoadEdge>,
    pub(crate) node_index: HashMap<NodeKey, NodeIndex>,
    pub(crate) rtree: RTree<IndexedNode>,
}

impl RoadNetwork {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, index: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(index)
    }

    pub fn node_by_key(&self, key: &NodeKey) -> Option<NodeIndex> {
        self.node_index.get(key).copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &RoadNode)> {
        self.graph
            .node_indices()
            .map(move |index| (index, &self.graph[index]))
    }

    pub fn edge(&self, index: EdgeIndex) -> Option<&RoadEdge> {
        self.graph.edge_weight(index)
    }

    /// All edges as `(from, to, edge)` in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, &RoadEdge)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), edge.weight()))
    }

    /// Edge connecting `a` and `b`, whichever order it was inserted in
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&RoadEdge> {
        self.graph
            .find_edge(a, b)
            .and_then(|index| self.graph.edge_weight(index))
    }

    /// Edges incident to `node` as `(neighbor, edge index, edge)`
    pub fn incident_edges(
        &self,
        node: NodeIndex,
    ) -> impl Iterator<Item = (NodeIndex, EdgeIndex, &RoadEdge)> {
        self.graph.edges(node).map(move |edge| {
            let neighbor = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (neighbor, edge.id(), edge.weight())
        })
    }

    pub fn neighbors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(node)
    }

    /// Finds the node closest to `point` by haversine distance
    ///
    /// Returns the node and its distance in kilometers, or `None` when the
    /// network is empty or the closest node is farther than `max_km`.
    pub fn nearest_node(&self, point: &Coordinate, max_km: f64) -> Option<(NodeIndex, f64)> {
        if self.is_empty() || max_km.is_nan() || max_km < 0.0 {
            return None;
        }

        let best = match search_radius_deg(point, max_km) {
            Some(radius) => closest(
                point,
                self.rtree
                    .locate_within_distance([point.lat, point.lon], radius * radius)
                    .map(|indexed| indexed.data),
                &self.graph,
            ),
            None => closest(point, self.graph.node_indices(), &self.graph),
        };

        best.filter(|&(_, distance)| distance <= max_km)
    }

    pub(crate) fn rebuild_spatial_index(&mut self) {
        let points = self
            .graph
            .node_indices()
            .map(|index| {
                let coordinate = self.graph[index].coordinate;
                GeomWithData::new([coordinate.lat, coordinate.lon], index)
            })
            .collect();
        self.rtree = RTree::bulk_load(points);
    }
}

/// Minimum distance node, lowest index on ties
fn closest(
    point: &Coordinate,
    candidates: impl Iterator<Item = NodeIndex>,
    graph: &UnGraph<RoadNode, RoadEdge>,
) -> Option<(NodeIndex, f64)> {
    candidates
        .map(|index| (index, haversine_km(*point, graph[index].coordinate)))
        .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
}

/// Planar radius in degrees enclosing every point within `max_km`
///
/// `None` when no useful bound exists (unbounded search, polar regions,
/// antimeridian), in which case all nodes are scanned.
fn search_radius_deg(point: &Coordinate, max_km: f64) -> Option<f64> {
    if !max_km.is_finite() {
        return None;
    }
    let lat_span = max_km / KM_PER_DEGREE;
    let worst_lat = (point.lat.abs() + lat_span).to_radians();
    if worst_lat >= 89f64.to_radians() {
        return None;
    }
    let lon_span = lat_span / worst_lat.cos();
    if point.lon.abs() + lon_span >= 180.0 {
        return None;
    }
    Some(lat_span.hypot(lon_span) * 1.1)
}
