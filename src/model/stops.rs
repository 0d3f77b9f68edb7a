//! Stop catalog with id, name and spatial lookups.

use geo::Point;
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use log::warn;
use rstar::RTree;
use rstar::primitives::GeomWithData;

use crate::StopId;
use crate::model::geometry::haversine_distance;

/// Spatial index entry: raw coordinates plus the stop id they belong to.
pub type IndexedPoint = GeomWithData<[f64; 2], StopId>;

/// A physical transit stopping point.
#[derive(Debug, Clone)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
    /// WGS84 position, x = longitude, y = latitude
    pub geometry: Point<f64>,
    /// Route numbers serving this stop, as published in the feed
    pub routes: Vec<String>,
}

const MIN_QUERY_LEN: usize = 2;
const MAX_SEARCH_RESULTS: usize = 50;

/// In-memory catalog of stops, immutable after construction.
#[derive(Clone)]
pub struct StopIndex {
    stops: Vec<Stop>,
    by_id: HashMap<StopId, usize>,
    by_name: HashMap<String, Vec<usize>>,
    rtree: RTree<IndexedPoint>,
}

impl std::fmt::Debug for StopIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StopIndex")
            .field("stops", &self.stops.len())
            .finish_non_exhaustive()
    }
}

impl StopIndex {
    /// Indexes the given stops, dropping records whose id was already seen.
    pub fn new(stops: Vec<Stop>) -> Self {
        let mut deduped: Vec<Stop> = Vec::with_capacity(stops.len());
        let mut by_id = HashMap::with_capacity(stops.len());

        for stop in stops {
            match by_id.entry(stop.id) {
                Entry::Vacant(entry) => {
                    entry.insert(deduped.len());
                    deduped.push(stop);
                }
                Entry::Occupied(_) => {
                    warn!("Duplicate stop id {} ({}), record dropped", stop.id, stop.name);
                }
            }
        }

        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, stop) in deduped.iter().enumerate() {
            by_name.entry(normalize_name(&stop.name)).or_default().push(idx);
        }

        let rtree = RTree::bulk_load(
            deduped
                .iter()
                .map(|stop| IndexedPoint::new([stop.geometry.x(), stop.geometry.y()], stop.id))
                .collect(),
        );

        Self { stops: deduped, by_id, by_name, rtree }
    }

    pub fn get(&self, id: StopId) -> Option<&Stop> {
        self.by_id.get(&id).map(|&idx| &self.stops[idx])
    }

    pub fn contains(&self, id: StopId) -> bool {
        self.by_id.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter()
    }

    /// Stops whose normalized name matches the query exactly.
    pub fn get_by_name(&self, name: &str) -> Vec<&Stop> {
        self.by_name
            .get(&normalize_name(name))
            .map(|indices| indices.iter().map(|&idx| &self.stops[idx]).collect())
            .unwrap_or_default()
    }

    /// Substring search over normalized names, best matches first.
    ///
    /// Exact matches outrank prefix matches, which outrank inner matches;
    /// among inner matches an earlier position wins. Queries shorter than
    /// two characters return nothing.
    pub fn search(&self, query: &str) -> Vec<&Stop> {
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }
        let needle = normalize_name(query);

        let mut hits: Vec<(i64, &Stop)> = self
            .stops
            .iter()
            .filter_map(|stop| {
                relevance(&normalize_name(&stop.name), &needle).map(|score| (score, stop))
            })
            .collect();
        hits.sort_by(|a, b| b.0.cmp(&a.0));
        hits.truncate(MAX_SEARCH_RESULTS);
        hits.into_iter().map(|(_, stop)| stop).collect()
    }

    /// The stop closest to the given point, with its distance in meters.
    pub fn nearest(&self, point: Point<f64>) -> Option<(&Stop, f64)> {
        let hit = self.rtree.nearest_neighbor(&[point.x(), point.y()])?;
        let stop = self.get(hit.data)?;
        Some((stop, haversine_distance(point, stop.geometry)))
    }
}

/// Canonical form for name comparisons: lowercased, `ё` folded to `е`,
/// whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .replace('ё', "е")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn relevance(name: &str, query: &str) -> Option<i64> {
    if name == query {
        return Some(1_000);
    }
    if name.starts_with(query) {
        return Some(500);
    }
    name.find(query).map(|pos| 100 - pos as i64)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn stop(id: StopId, name: &str, latitude: f64, longitude: f64) -> Stop {
        Stop {
            id,
            name: name.to_string(),
            geometry: Point::new(longitude, latitude),
            routes: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Улица   Гагарина "), "улица гагарина");
        assert_eq!(normalize_name("Зелёный базар"), "зеленый базар");
    }

    #[test]
    fn test_duplicate_ids_dropped() {
        let index = StopIndex::new(vec![
            stop(1, "Первая", 38.60, 68.78),
            stop(1, "Дубль", 38.61, 68.79),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1).unwrap().name, "Первая");
    }

    #[test]
    fn test_search_ranking() {
        let index = StopIndex::new(vec![
            stop(1, "Центральный рынок", 38.60, 68.78),
            stop(2, "Рынок", 38.61, 68.78),
            stop(3, "Рынок Барзоб", 38.62, 68.78),
        ]);
        let hits: Vec<StopId> = index.search("рынок").iter().map(|s| s.id).collect();
        assert_eq!(hits, vec![2, 3, 1]);
    }

    #[test]
    fn test_search_short_query_returns_nothing() {
        let index = StopIndex::new(vec![stop(1, "Рынок", 38.60, 68.78)]);
        assert!(index.search("р").is_empty());
    }

    #[test]
    fn test_get_by_name_is_normalized() {
        let index = StopIndex::new(vec![stop(1, "Зелёный базар", 38.60, 68.78)]);
        assert_eq!(index.get_by_name("зеленый  базар").len(), 1);
    }

    #[test]
    fn test_nearest() {
        let index = StopIndex::new(vec![
            stop(1, "Ближняя", 38.600, 68.780),
            stop(2, "Дальняя", 38.650, 68.780),
        ]);
        let (found, distance) = index.nearest(Point::new(68.780, 38.601)).unwrap();
        assert_eq!(found.id, 1);
        assert_relative_eq!(distance, 111.195, max_relative = 1e-3);
    }
}
