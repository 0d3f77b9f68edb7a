use geo::Point;
use itertools::Itertools;
use log::{debug, info, warn};
use rayon::prelude::*;

use super::config::RoutingConfig;
use super::snapshot::{RouteRecord, StopRecord, TransitSnapshot};
use crate::model::geometry::haversine_distance;
use crate::model::{routes, Stop, StopIndex, TransitGraph, TransitModel, TransitModelMeta, TransitRoute, TransportKind};
use crate::{Error, StopId};

/// Region plausibility bounds; records outside are corrupt and dropped
/// before indexing.
const MIN_PLAUSIBLE_LATITUDE: f64 = 30.0;
const MIN_PLAUSIBLE_LONGITUDE: f64 = 60.0;

/// Creates a routing model from a snapshot of stop and route records.
///
/// # Errors
///
/// Returns an error if the configuration is unusable; malformed records are
/// tolerated and skipped instead.
pub fn create_transit_model(
    snapshot: TransitSnapshot,
    config: RoutingConfig,
) -> Result<TransitModel, Error> {
    validate_config(&config)?;

    let TransitSnapshot { stops, routes } = snapshot;
    info!(
        "Building transit model from {} stop and {} route records",
        stops.len(),
        routes.len()
    );

    let stop_index = index_stops(stops);
    let routes = resolve_routes(routes);
    let graph = build_graph(&stop_index, &routes, &config);

    let model = TransitModel {
        stops: stop_index,
        routes,
        graph,
        meta: TransitModelMeta {
            snapshot_version: TransitModel::next_snapshot_version(),
            config,
        },
    };

    let stats = model.stats();
    info!(
        "Transit model ready: {} stops, {} routes, {} ride arcs, {} walking arcs",
        stats.stops, stats.routes, stats.ride_arcs, stats.walking_arcs
    );
    Ok(model)
}

fn validate_config(config: &RoutingConfig) -> Result<(), Error> {
    if !config.max_walking_distance_meters.is_finite() || config.max_walking_distance_meters < 0.0 {
        return Err(Error::InvalidData(format!(
            "Invalid max walking distance: {}",
            config.max_walking_distance_meters
        )));
    }
    if !config.average_speed_kmh.is_finite() || config.average_speed_kmh <= 0.0 {
        return Err(Error::InvalidData(format!(
            "Invalid average speed: {}",
            config.average_speed_kmh
        )));
    }
    if config.transfer_penalty_minutes < 0.0 || config.walking_penalty_meters < 0.0 {
        return Err(Error::InvalidData(
            "Penalties must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn index_stops(records: Vec<StopRecord>) -> StopIndex {
    let total = records.len();
    let stops: Vec<Stop> = records
        .into_iter()
        .filter_map(|record| {
            if !plausible_coordinates(record.latitude, record.longitude) {
                debug!(
                    "Dropping stop {} ({}): implausible coordinates {}, {}",
                    record.id, record.name, record.latitude, record.longitude
                );
                return None;
            }
            Some(Stop {
                id: record.id,
                name: record.name,
                geometry: Point::new(record.longitude, record.latitude),
                routes: record.routes,
            })
        })
        .collect();

    let dropped = total - stops.len();
    if dropped > 0 {
        warn!("Dropped {dropped} of {total} stop records with implausible coordinates");
    }
    StopIndex::new(stops)
}

fn plausible_coordinates(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && latitude > MIN_PLAUSIBLE_LATITUDE
        && longitude > MIN_PLAUSIBLE_LONGITUDE
}

/// Derives display metadata for each route; the input records are consumed,
/// never mutated in place.
fn resolve_routes(records: Vec<RouteRecord>) -> Vec<TransitRoute> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let kind = TransportKind::from_route_number(routes::route_number(&record.name));
            let color = record
                .color
                .unwrap_or_else(|| routes::default_color(index).to_string());
            TransitRoute {
                id: record.id,
                name: record.name,
                color,
                kind,
                stop_ids: record.stops,
            }
        })
        .collect()
}

fn build_graph(stops: &StopIndex, routes: &[TransitRoute], config: &RoutingConfig) -> TransitGraph {
    let mut graph = TransitGraph::new();
    for stop in stops.iter() {
        graph.add_stop(stop.id, stop.geometry);
    }

    add_ride_edges(&mut graph, stops, routes);
    add_walking_edges(&mut graph, stops, config.max_walking_distance_meters);

    let components = graph.component_count();
    if components > 1 {
        warn!(
            "Transit network splits into {components} disconnected components; \
            trips across them will find no route"
        );
    }
    graph
}

fn add_ride_edges(graph: &mut TransitGraph, stops: &StopIndex, routes: &[TransitRoute]) {
    for route in routes {
        if route.stop_ids.len() < 2 {
            continue;
        }
        for (&from, &to) in route.stop_ids.iter().tuple_windows() {
            // Unresolved entries are display-only; they get no edges
            let (Some(from_stop), Some(to_stop)) = (stops.get(from), stops.get(to)) else {
                continue;
            };
            let distance = haversine_distance(from_stop.geometry, to_stop.geometry);
            graph.upsert_ride_edge(from, to, distance, route.id);
            graph.upsert_ride_edge(to, from, distance, route.id);
        }
    }
}

/// Synthesizes walking arcs between stops close enough to change on foot.
///
/// The scan is quadratic over the catalog; municipal stop counts keep that
/// cheap, and the pair enumeration runs in parallel.
fn add_walking_edges(graph: &mut TransitGraph, stops: &StopIndex, max_distance: f64) {
    let catalog: Vec<&Stop> = stops.iter().collect();
    let count = catalog.len();

    let candidates: Vec<Vec<(StopId, StopId, f64)>> = (0..count)
        .into_par_iter()
        .map(|i| {
            let a = catalog[i];
            ((i + 1)..count)
                .filter_map(|j| {
                    let b = catalog[j];
                    let distance = haversine_distance(a.geometry, b.geometry);
                    (distance <= max_distance).then_some((a.id, b.id, distance))
                })
                .collect()
        })
        .collect();

    let mut added = 0usize;
    for (a, b, distance) in candidates.into_iter().flatten() {
        if graph.add_walking_pair(a, b, distance) {
            added += 1;
        }
    }
    debug!("Synthesized walking connections for {added} stop pairs within {max_distance} m");
}
