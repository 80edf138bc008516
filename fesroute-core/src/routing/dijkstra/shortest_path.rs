use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::state::State;
use crate::model::{Coordinate, RoadEdge, RoadNetwork, TrafficLevel, traffic_factor};

/// Node path between two graph nodes with the edges joining them
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedPath {
    /// Visited nodes from source to target, both included
    pub nodes: Vec<NodeIndex>,
    /// `edges[i]` joins `nodes[i]` and `nodes[i + 1]`
    pub edges: Vec<EdgeIndex>,
    /// Traffic-weighted cost, kilometers scaled by traffic factors
    pub cost: f64,
}

impl SolvedPath {
    pub fn coordinates(&self, network: &RoadNetwork) -> Vec<Coordinate> {
        self.nodes
            .iter()
            .filter_map(|&node| network.node(node).map(|n| n.coordinate))
            .collect()
    }
}

/// Traffic-weighted traversal cost of an edge
pub fn edge_cost(edge: &RoadEdge, level: TrafficLevel) -> f64 {
    edge.distance_km * traffic_factor(&edge.traffic, level)
}

/// Dijkstra's algorithm between two nodes of the road network
///
/// Edges are weighted by [`edge_cost`]. The search stops as soon as the
/// target is settled. Returns `None` if either node does not exist or the
/// target is in a different connected component.
pub fn shortest_path(
    network: &RoadNetwork,
    source: NodeIndex,
    target: NodeIndex,
    level: TrafficLevel,
) -> Option<SolvedPath> {
    if network.node(source).is_none() || network.node(target).is_none() {
        return None;
    }

    let node_count = network.node_count();
    let mut costs: HashMap<NodeIndex, f64> = HashMap::with_capacity(node_count.min(1024));
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(node_count.min(1024));
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    heap.push(State {
        cost: 0.0,
        node: source,
    });
    costs.insert(source, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        // Stale entry, a cheaper one was already processed
        if settled.contains(node.index()) {
            continue;
        }
        settled.insert(node.index());

        if node == target {
            break;
        }

        for (next, edge_index, edge) in network.incident_edges(node) {
            if settled.contains(next.index()) {
                continue;
            }
            let next_cost = cost + edge_cost(edge, level);

            match costs.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    predecessors.insert(next, (node, edge_index));
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        predecessors.insert(next, (node, edge_index));
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                    }
                }
            }
        }
    }

    if !settled.contains(target.index()) {
        return None;
    }

    // Follow predecessors backward from target to source
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while current != source {
        let &(previous, edge) = predecessors.get(&current)?;
        nodes.push(previous);
        edges.push(edge);
        current = previous;
    }
    nodes.reverse();
    edges.reverse();

    Some(SolvedPath {
        nodes,
        edges,
        cost: costs.get(&target).copied().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeKey, RoadSegment, TrafficTag, haversine_km};

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    fn node(network: &RoadNetwork, lat: f64, lon: f64) -> NodeIndex {
        network
            .node_by_key(&NodeKey::from_coordinate(&c(lat, lon)))
            .unwrap()
    }

    /// Square with a dense direct side and a fluid detour
    ///
    /// ```text
    /// A(34.00,-5.00) --dense-- B(34.00,-4.99)
    ///   |                        |
    /// D(34.01,-5.00) --fluid-- C(34.01,-4.99)
    /// ```
    fn square() -> RoadNetwork {
        RoadNetwork::from_segments(&[
            RoadSegment::new(1, "A-B", vec![c(34.00, -5.00), c(34.00, -4.99)])
                .with_traffic(TrafficTag::Dense),
            RoadSegment::new(2, "A-D-C-B", vec![
                c(34.00, -5.00),
                c(34.01, -5.00),
                c(34.01, -4.99),
                c(34.00, -4.99),
            ])
            .with_traffic(TrafficTag::Fluid),
        ])
    }

    #[test]
    fn picks_direct_edge_when_cheaper() {
        let network = square();
        let a = node(&network, 34.00, -5.00);
        let d = node(&network, 34.01, -5.00);
        let path = shortest_path(&network, a, d, TrafficLevel::Normal).unwrap();
        assert_eq!(path.nodes, vec![a, d]);
        assert_eq!(path.edges.len(), 1);
    }

    #[test]
    fn dense_direct_edge_beats_long_fluid_detour() {
        let network = square();
        let a = node(&network, 34.00, -5.00);
        let b = node(&network, 34.00, -4.99);
        // direct: 0.92 km * 1.5 = 1.38; detour: (1.11 + 0.92 + 1.11) * 0.8 = 2.52
        let path = shortest_path(&network, a, b, TrafficLevel::Light).unwrap();
        assert_eq!(path.nodes, vec![a, b]);
        let direct = haversine_km(c(34.00, -5.00), c(34.00, -4.99));
        assert!((path.cost - direct * 1.5).abs() < 1e-9);
    }

    #[test]
    fn cost_respects_lower_bound() {
        let network = square();
        for (from, to) in [(0, 1), (0, 2), (1, 3), (2, 3)] {
            let (from, to) = (NodeIndex::new(from), NodeIndex::new(to));
            let direct = haversine_km(
                network.node(from).unwrap().coordinate,
                network.node(to).unwrap().coordinate,
            );
            for level in [TrafficLevel::Light, TrafficLevel::Normal, TrafficLevel::Heavy] {
                let path = shortest_path(&network, from, to, level).unwrap();
                assert!(path.cost >= direct * 0.8 - 1e-12);
                assert_eq!(path.edges.len() + 1, path.nodes.len());
            }
        }
    }

    #[test]
    fn same_source_and_target() {
        let network = square();
        let a = node(&network, 34.00, -5.00);
        let path = shortest_path(&network, a, a, TrafficLevel::Heavy).unwrap();
        assert_eq!(path.nodes, vec![a]);
        assert!(path.edges.is_empty());
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn disconnected_components_are_unreachable() {
        let network = RoadNetwork::from_segments(&[
            RoadSegment::new(1, "west", vec![c(34.00, -5.00), c(34.01, -5.00)]),
            RoadSegment::new(2, "east", vec![c(34.00, -4.90), c(34.01, -4.90)]),
        ]);
        let west = node(&network, 34.00, -5.00);
        let east = node(&network, 34.01, -4.90);
        assert!(shortest_path(&network, west, east, TrafficLevel::Normal).is_none());
        assert!(shortest_path(&network, east, west, TrafficLevel::Normal).is_none());
    }

    #[test]
    fn unknown_nodes_are_unreachable() {
        let network = square();
        let a = node(&network, 34.00, -5.00);
        assert!(shortest_path(&network, a, NodeIndex::new(99), TrafficLevel::Normal).is_none());
    }

    #[test]
    fn symmetric_costs() {
        let network = square();
        let a = node(&network, 34.00, -5.00);
        let c_node = node(&network, 34.01, -4.99);
        let there = shortest_path(&network, a, c_node, TrafficLevel::Normal).unwrap();
        let back = shortest_path(&network, c_node, a, TrafficLevel::Normal).unwrap();
        assert!((there.cost - back.cost).abs() < 1e-12);
    }
}
