//! Itinerary reconstruction: a raw stop path becomes ride and walk segments.

mod to_geojson;

use itertools::Itertools;
use serde::Serialize;

use crate::loading::RoutingConfig;
use crate::model::TransitGraph;
use crate::routing::dijkstra::FoundPath;
use crate::{RouteId, StopId};

/// One contiguous leg of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// An uninterrupted run of stops ridden on one route.
    Ride { route: RouteId, stops: Vec<StopId> },
    /// A single pedestrian hop between two nearby stops.
    Walk { from: StopId, to: StopId, distance: f64 },
}

impl Segment {
    pub fn is_walk(&self) -> bool {
        matches!(self, Segment::Walk { .. })
    }
}

/// A computed trip plan, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    /// Every stop visited, in travel order
    pub stops: Vec<StopId>,
    pub segments: Vec<Segment>,
    /// Meters actually traveled; search penalties are not included
    pub total_distance: f64,
    /// Estimated minutes, interchange time per transfer included
    pub estimated_time: f64,
    /// Route changes between ride segments; walks separate rides without
    /// counting as transfers themselves
    pub transfers: usize,
}

impl Itinerary {
    /// Trip from a stop to itself: nothing to ride, nothing to walk.
    pub(crate) fn degenerate(stop: StopId) -> Self {
        Self {
            stops: vec![stop],
            segments: Vec::new(),
            total_distance: 0.0,
            estimated_time: 0.0,
            transfers: 0,
        }
    }
}

/// Groups a found path into segments and computes the trip totals.
pub fn build_itinerary(path: &FoundPath, graph: &TransitGraph, config: &RoutingConfig) -> Itinerary {
    let mut segments = Vec::new();
    let mut total_distance = 0.0;
    let mut active_route: Option<RouteId> = None;
    let mut buffer: Vec<StopId> = path.stops.first().copied().into_iter().collect();

    for (&from, &to) in path.stops.iter().tuple_windows() {
        let (Some(from_node), Some(to_node)) = (graph.node(from), graph.node(to)) else {
            continue;
        };
        let Some(edge) = graph.edge_between(from_node, to_node) else {
            continue;
        };
        total_distance += edge.distance;

        if edge.walking {
            flush_ride(&mut segments, std::mem::take(&mut buffer), active_route);
            segments.push(Segment::Walk { from, to, distance: edge.distance });
            buffer = vec![to];
            active_route = None;
        } else if let Some(active) = active_route
            && !edge.routes.contains(&active)
        {
            // Forced transfer: the route in effect does not serve this hop
            flush_ride(
                &mut segments,
                std::mem::replace(&mut buffer, vec![from, to]),
                Some(active),
            );
            active_route = edge.routes.first().copied();
        } else {
            buffer.push(to);
            if active_route.is_none() {
                active_route = edge.routes.first().copied();
            }
        }
    }
    flush_ride(&mut segments, buffer, active_route);

    let rides = segments.iter().filter(|segment| !segment.is_walk()).count();
    let transfers = rides.saturating_sub(1);
    let estimated_time = (total_distance / 1000.0) / config.average_speed_kmh * 60.0
        + transfers as f64 * config.transfer_penalty_minutes;

    Itinerary {
        stops: path.stops.clone(),
        segments,
        total_distance,
        estimated_time,
        transfers,
    }
}

/// A ride segment needs at least two stops and a route to ride on.
fn flush_ride(segments: &mut Vec<Segment>, stops: Vec<StopId>, route: Option<RouteId>) {
    if stops.len() > 1
        && let Some(route) = route
    {
        segments.push(Segment::Ride { route, stops });
    }
}
