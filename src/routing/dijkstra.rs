//! Shortest-path search with route-continuity awareness.
//!
//! Plain static edge weights are not enough here: the cost of an arc depends
//! on the route used to reach its source. Each node's best record therefore
//! carries the route in effect alongside cost and predecessor, and edge
//! relaxation consults it to charge transfer and walking penalties.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

use crate::loading::RoutingConfig;
use crate::model::{TransitEdge, TransitGraph};
use crate::{RouteId, StopId};

#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node: NodeIndex,
}

impl Eq for State {}

// Min-heap by cost (reversed from standard Rust BinaryHeap)
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best known way to reach one node.
#[derive(Debug, Clone, Copy)]
struct BestRecord {
    cost: f64,
    predecessor: Option<NodeIndex>,
    /// Route in effect when this cost was achieved: none before boarding
    /// anything and after arriving on foot.
    route: Option<RouteId>,
}

const UNREACHED: BestRecord = BestRecord {
    cost: f64::INFINITY,
    predecessor: None,
    route: None,
};

/// A found path with its cumulative search cost, penalties included.
#[derive(Debug, Clone, PartialEq)]
pub struct FoundPath {
    /// Stop ids from source to destination
    pub stops: Vec<StopId>,
    pub cost: f64,
}

/// Searches for the cheapest stop sequence between two stops.
///
/// Returns `None` when either stop is missing from the graph, when the
/// destination is unreachable, or when source and destination coincide (a
/// degenerate trip never enters the search).
pub fn find_path(
    graph: &TransitGraph,
    from: StopId,
    to: StopId,
    config: &RoutingConfig,
) -> Option<FoundPath> {
    let source = graph.node(from)?;
    let target = graph.node(to)?;

    let node_count = graph.node_count();
    let mut best = vec![UNREACHED; node_count];
    let mut settled = FixedBitSet::with_capacity(node_count);
    let mut heap = BinaryHeap::new();

    best[source.index()].cost = 0.0;
    heap.push(State { cost: 0.0, node: source });

    while let Some(State { cost, node }) = heap.pop() {
        // Skip stale queue entries for nodes improved after the push
        if settled.contains(node.index()) || cost > best[node.index()].cost {
            continue;
        }
        settled.insert(node.index());
        if node == target {
            break;
        }

        let current = best[node.index()];
        for edge in graph.edges(node) {
            let next = edge.target();
            if settled.contains(next.index()) {
                continue;
            }

            let weight = edge.weight();
            let next_cost = current.cost + edge_cost(&current, weight, config);
            let record = &mut best[next.index()];
            if next_cost < record.cost {
                record.cost = next_cost;
                record.predecessor = Some(node);
                record.route = arrival_route(current.route, weight);
                heap.push(State { cost: next_cost, node: next });
            }
        }
    }

    // An unreached destination never got a predecessor
    best[target.index()].predecessor?;

    let mut nodes = Vec::new();
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        nodes.push(node);
        cursor = best[node.index()].predecessor;
    }
    nodes.reverse();

    Some(FoundPath {
        stops: nodes.into_iter().map(|node| graph.stop_id(node)).collect(),
        cost: best[target.index()].cost,
    })
}

/// Physical hop length plus the applicable penalty: walking hops carry the
/// flat walking surcharge, ride hops carry the transfer penalty when none of
/// their routes continues the one in effect.
fn edge_cost(current: &BestRecord, edge: &TransitEdge, config: &RoutingConfig) -> f64 {
    let mut cost = edge.distance;
    if edge.walking {
        cost += config.walking_penalty_meters;
    } else if let Some(active) = current.route
        && !edge.routes.contains(&active)
    {
        cost += config.transfer_penalty_meters();
    }
    cost
}

/// Route in effect after traversing `edge`: walking clears it, a ride that
/// continues the active route keeps it, any other ride switches to that
/// edge's primary route.
fn arrival_route(active: Option<RouteId>, edge: &TransitEdge) -> Option<RouteId> {
    if edge.walking {
        return None;
    }
    match active {
        Some(route) if edge.routes.contains(&route) => Some(route),
        _ => edge.routes.first().copied(),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::Point;

    use super::*;

    fn graph_with_stops(ids: &[StopId]) -> TransitGraph {
        let mut graph = TransitGraph::new();
        for (i, &id) in ids.iter().enumerate() {
            graph.add_stop(id, Point::new(68.78, 38.60 + i as f64 * 0.01));
        }
        graph
    }

    fn ride(graph: &mut TransitGraph, a: StopId, b: StopId, distance: f64, route: RouteId) {
        graph.upsert_ride_edge(a, b, distance, route);
        graph.upsert_ride_edge(b, a, distance, route);
    }

    #[test]
    fn test_single_route_path() {
        let mut graph = graph_with_stops(&[1, 2, 3]);
        ride(&mut graph, 1, 2, 400.0, 10);
        ride(&mut graph, 2, 3, 600.0, 10);

        let path = find_path(&graph, 1, 3, &RoutingConfig::default()).unwrap();
        assert_eq!(path.stops, vec![1, 2, 3]);
        assert_relative_eq!(path.cost, 1_000.0);
    }

    #[test]
    fn test_transfer_penalty_steers_route_choice() {
        // Direct ride on one route is longer than the two-route shortcut,
        // but the shortcut costs a transfer on top of its distance
        let mut graph = graph_with_stops(&[1, 2, 3]);
        ride(&mut graph, 1, 3, 3_500.0, 10);
        ride(&mut graph, 1, 2, 1_000.0, 10);
        ride(&mut graph, 2, 3, 1_000.0, 20);

        let path = find_path(&graph, 1, 3, &RoutingConfig::default()).unwrap();
        assert_eq!(path.stops, vec![1, 3]);
        assert_relative_eq!(path.cost, 3_500.0);
    }

    #[test]
    fn test_shortcut_wins_when_served_by_same_route() {
        // Same geometry, but the shortcut continues route 10: no penalty
        let mut graph = graph_with_stops(&[1, 2, 3]);
        ride(&mut graph, 1, 3, 3_500.0, 10);
        ride(&mut graph, 1, 2, 1_000.0, 10);
        ride(&mut graph, 2, 3, 1_000.0, 10);

        let path = find_path(&graph, 1, 3, &RoutingConfig::default()).unwrap();
        assert_eq!(path.stops, vec![1, 2, 3]);
        assert_relative_eq!(path.cost, 2_000.0);
    }

    #[test]
    fn test_walking_penalty_applied() {
        let mut graph = graph_with_stops(&[1, 2]);
        graph.add_walking_pair(1, 2, 250.0);

        let path = find_path(&graph, 1, 2, &RoutingConfig::default()).unwrap();
        assert_relative_eq!(path.cost, 450.0);
    }

    #[test]
    fn test_walking_resets_route_continuity() {
        // Ride 10, walk, ride 20: the boarding after the walk starts from a
        // clean slate and is not charged as a transfer
        let mut graph = graph_with_stops(&[1, 2, 3, 4]);
        ride(&mut graph, 1, 2, 500.0, 10);
        graph.add_walking_pair(2, 3, 250.0);
        ride(&mut graph, 3, 4, 500.0, 20);

        let path = find_path(&graph, 1, 4, &RoutingConfig::default()).unwrap();
        assert_eq!(path.stops, vec![1, 2, 3, 4]);
        assert_relative_eq!(path.cost, 500.0 + (250.0 + 200.0) + 500.0);
    }

    #[test]
    fn test_no_path_between_components() {
        let mut graph = graph_with_stops(&[1, 2, 3, 4]);
        ride(&mut graph, 1, 2, 500.0, 10);
        ride(&mut graph, 3, 4, 500.0, 20);

        assert!(find_path(&graph, 1, 4, &RoutingConfig::default()).is_none());
    }

    #[test]
    fn test_unknown_stop_yields_none() {
        let graph = graph_with_stops(&[1]);
        assert!(find_path(&graph, 1, 99, &RoutingConfig::default()).is_none());
    }

    #[test]
    fn test_source_equals_target_yields_none() {
        // Degenerate trips are answered before the search is entered
        let mut graph = graph_with_stops(&[1, 2]);
        ride(&mut graph, 1, 2, 500.0, 10);
        assert!(find_path(&graph, 1, 1, &RoutingConfig::default()).is_none());
    }

    #[test]
    fn test_cost_is_symmetric_on_single_route_network() {
        let mut graph = graph_with_stops(&[1, 2, 3]);
        ride(&mut graph, 1, 2, 400.0, 10);
        ride(&mut graph, 2, 3, 600.0, 10);

        let config = RoutingConfig::default();
        let forward = find_path(&graph, 1, 3, &config).unwrap();
        let backward = find_path(&graph, 3, 1, &config).unwrap();
        assert_relative_eq!(forward.cost, backward.cost);
        assert_eq!(
            forward.stops,
            backward.stops.iter().rev().copied().collect::<Vec<_>>()
        );
    }
}
