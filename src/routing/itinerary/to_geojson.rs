//! GeoJSON export of itineraries for the display layer.

use geo::{Coord, LineString};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use super::{Itinerary, Segment};
use crate::model::TransitModel;
use crate::{Error, RouteId, StopId};

impl Itinerary {
    /// Converts the itinerary to a `GeoJSON` `FeatureCollection`, one
    /// feature per segment.
    pub fn to_geojson(&self, model: &TransitModel) -> Result<FeatureCollection, Error> {
        let mut features = Vec::with_capacity(self.segments.len());
        for (idx, segment) in self.segments.iter().enumerate() {
            let feature = match segment {
                Segment::Ride { route, stops } => create_ride_feature(model, idx, *route, stops)?,
                Segment::Walk { from, to, distance } => {
                    create_walk_feature(model, idx, *from, *to, *distance)?
                }
            };
            features.push(feature);
        }
        Ok(FeatureCollection { features, bbox: None, foreign_members: None })
    }

    pub fn to_geojson_string(&self, model: &TransitModel) -> Result<String, Error> {
        serde_json::to_string(&self.to_geojson(model)?)
            .map_err(|e| Error::GeoJsonError(e.to_string()))
    }
}

fn stop_coord(model: &TransitModel, stop: StopId) -> Coord<f64> {
    model
        .stops
        .get(stop)
        .map_or(Coord { x: 0.0, y: 0.0 }, |s| s.geometry.into())
}

fn stop_name(model: &TransitModel, stop: StopId) -> String {
    model
        .stops
        .get(stop)
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

fn create_ride_feature(
    model: &TransitModel,
    leg_idx: usize,
    route_id: RouteId,
    stops: &[StopId],
) -> Result<Feature, Error> {
    let coords: Vec<Coord<f64>> = stops.iter().map(|&stop| stop_coord(model, stop)).collect();
    let geometry = Geometry::new(GeoJsonValue::from(&LineString::new(coords)));

    let (route_name, color) = model
        .route(route_id)
        .map_or_else(|| (String::new(), String::new()), |r| (r.name.clone(), r.color.clone()));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": "ride",
            "leg_index": leg_idx,
            "route_id": route_id,
            "route_name": route_name,
            "color": color,
            "from_name": stops.first().map_or_else(String::new, |&s| stop_name(model, s)),
            "to_name": stops.last().map_or_else(String::new, |&s| stop_name(model, s)),
            "stop_count": stops.len(),
        }
    });

    serde_json::from_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}

fn create_walk_feature(
    model: &TransitModel,
    leg_idx: usize,
    from: StopId,
    to: StopId,
    distance: f64,
) -> Result<Feature, Error> {
    let linestring = LineString::new(vec![stop_coord(model, from), stop_coord(model, to)]);
    let geometry = Geometry::new(GeoJsonValue::from(&linestring));

    let value = json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "leg_type": "walk",
            "leg_index": leg_idx,
            "from_name": stop_name(model, from),
            "to_name": stop_name(model, to),
            "distance": distance,
        }
    });

    serde_json::from_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
}
