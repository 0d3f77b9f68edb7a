//! Input contract with the data-loading layer.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use super::de;
use crate::{Error, RouteId, StopId};

/// One stop record as supplied by the data loader.
#[derive(Debug, Clone, Deserialize)]
pub struct StopRecord {
    pub id: StopId,
    pub name: String,
    #[serde(deserialize_with = "de::flexible_float")]
    pub latitude: f64,
    #[serde(deserialize_with = "de::flexible_float")]
    pub longitude: f64,
    /// Route numbers serving this stop
    #[serde(default, deserialize_with = "de::string_or_seq", alias = "routeIdsServed")]
    pub routes: Vec<String>,
}

/// One route record: an ordered walk over stop ids. Ids that fail to
/// resolve against the stop index are tolerated and produce no edges.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteRecord {
    pub id: RouteId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default, alias = "orderedStopIds")]
    pub stops: Vec<StopId>,
}

/// A full network snapshot. Aliases accept the legacy feed field names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitSnapshot {
    #[serde(default, alias = "bus_stops")]
    pub stops: Vec<StopRecord>,
    #[serde(default, alias = "bus_routes")]
    pub routes: Vec<RouteRecord>,
}

impl TransitSnapshot {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to open snapshot '{}': {}", path.display(), e),
            )
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}
