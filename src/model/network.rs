//! Transit network graph: stops as nodes, ride and walking arcs between them.

use geo::Point;
use hashbrown::HashMap;
use petgraph::Directed;
use petgraph::graph::{Edges, Graph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::{RouteId, StopId};

/// Graph node: a stop admitted to the network.
#[derive(Debug, Clone)]
pub struct StopNode {
    pub stop_id: StopId,
    pub geometry: Point<f64>,
}

/// Graph arc between two adjacent stops.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitEdge {
    /// Great-circle length of the hop in meters
    pub distance: f64,
    /// Routes traversing this stop pair consecutively; empty for walking arcs
    pub routes: Vec<RouteId>,
    /// Synthesized pedestrian connection
    pub walking: bool,
}

impl TransitEdge {
    pub fn is_ride(&self) -> bool {
        !self.walking
    }
}

/// Directed adjacency over stop nodes. Every ride or walking relationship is
/// stored as two arcs, one per direction, and between any ordered stop pair
/// there is at most one ride arc and at most one walking arc.
#[derive(Debug, Clone, Default)]
pub struct TransitGraph {
    graph: Graph<StopNode, TransitEdge>,
    node_ids: HashMap<StopId, NodeIndex>,
}

impl TransitGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_stop(&mut self, stop_id: StopId, geometry: Point<f64>) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .node_ids
            .entry(stop_id)
            .or_insert_with(|| graph.add_node(StopNode { stop_id, geometry }))
    }

    pub fn node(&self, stop_id: StopId) -> Option<NodeIndex> {
        self.node_ids.get(&stop_id).copied()
    }

    pub fn stop_id(&self, node: NodeIndex) -> StopId {
        self.graph[node].stop_id
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn arc_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Outgoing arcs of a node.
    pub fn edges(&self, node: NodeIndex) -> Edges<'_, TransitEdge, Directed> {
        self.graph.edges(node)
    }

    /// All arcs as `(from stop, to stop, edge)` triples.
    pub fn arcs(&self) -> impl Iterator<Item = (StopId, StopId, &TransitEdge)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].stop_id,
                self.graph[edge.target()].stop_id,
                edge.weight(),
            )
        })
    }

    /// The arc actually used between two adjacent stops: the ride arc when
    /// one exists, the walking arc otherwise.
    pub fn edge_between(&self, from: NodeIndex, to: NodeIndex) -> Option<&TransitEdge> {
        let mut walking = None;
        for edge in self.graph.edges_connecting(from, to) {
            if edge.weight().is_ride() {
                return Some(edge.weight());
            }
            walking = Some(edge.weight());
        }
        walking
    }

    /// Inserts a ride arc, or merges the route into the existing ride arc's
    /// route set when the pair is already connected.
    pub(crate) fn upsert_ride_edge(
        &mut self,
        from: StopId,
        to: StopId,
        distance: f64,
        route: RouteId,
    ) {
        let (Some(from_node), Some(to_node)) = (self.node(from), self.node(to)) else {
            return;
        };
        let existing = self
            .graph
            .edges_connecting(from_node, to_node)
            .find(|edge| edge.weight().is_ride())
            .map(|edge| edge.id());
        match existing {
            Some(edge_id) => {
                let edge = &mut self.graph[edge_id];
                if !edge.routes.contains(&route) {
                    edge.routes.push(route);
                }
            }
            None => {
                self.graph.add_edge(
                    from_node,
                    to_node,
                    TransitEdge { distance, routes: vec![route], walking: false },
                );
            }
        }
    }

    /// Adds walking arcs in both directions between two stops, skipping any
    /// direction that is already connected. Returns whether anything was
    /// added.
    pub(crate) fn add_walking_pair(&mut self, a: StopId, b: StopId, distance: f64) -> bool {
        let (Some(a_node), Some(b_node)) = (self.node(a), self.node(b)) else {
            return false;
        };
        let mut added = false;
        for (from, to) in [(a_node, b_node), (b_node, a_node)] {
            if self.graph.find_edge(from, to).is_none() {
                self.graph.add_edge(
                    from,
                    to,
                    TransitEdge { distance, routes: Vec::new(), walking: true },
                );
                added = true;
            }
        }
        added
    }

    /// Number of weakly connected components, for data-quality diagnostics.
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_stops(ids: &[StopId]) -> TransitGraph {
        let mut graph = TransitGraph::new();
        for (i, &id) in ids.iter().enumerate() {
            graph.add_stop(id, Point::new(68.78, 38.60 + i as f64 * 0.01));
        }
        graph
    }

    #[test]
    fn test_ride_edges_merge_routes() {
        let mut graph = graph_with_stops(&[1, 2]);
        graph.upsert_ride_edge(1, 2, 500.0, 10);
        graph.upsert_ride_edge(1, 2, 500.0, 20);
        graph.upsert_ride_edge(1, 2, 500.0, 10);

        assert_eq!(graph.arc_count(), 1);
        let edge = graph.edge_between(graph.node(1).unwrap(), graph.node(2).unwrap()).unwrap();
        assert_eq!(edge.routes, vec![10, 20]);
        assert!(edge.is_ride());
    }

    #[test]
    fn test_walking_pair_skips_connected_stops() {
        let mut graph = graph_with_stops(&[1, 2]);
        graph.upsert_ride_edge(1, 2, 500.0, 10);
        graph.upsert_ride_edge(2, 1, 500.0, 10);

        assert!(!graph.add_walking_pair(1, 2, 250.0));
        assert_eq!(graph.arc_count(), 2);
    }

    #[test]
    fn test_walking_pair_adds_both_arcs() {
        let mut graph = graph_with_stops(&[1, 2]);
        assert!(graph.add_walking_pair(1, 2, 250.0));

        assert_eq!(graph.arc_count(), 2);
        for (_, _, edge) in graph.arcs() {
            assert!(edge.walking);
            assert!(edge.routes.is_empty());
        }
    }

    #[test]
    fn test_component_count() {
        let mut graph = graph_with_stops(&[1, 2, 3, 4]);
        graph.upsert_ride_edge(1, 2, 500.0, 10);
        graph.upsert_ride_edge(2, 1, 500.0, 10);
        graph.upsert_ride_edge(3, 4, 500.0, 20);
        graph.upsert_ride_edge(4, 3, 500.0, 20);
        assert_eq!(graph.component_count(), 2);
    }
}
