//! Aggregate routing model: one immutable, versioned snapshot of the network.

use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::loading::RoutingConfig;
use crate::model::{StopIndex, TransitGraph, TransitRoute};
use crate::routing::{Itinerary, build_itinerary, find_path};
use crate::{Error, RouteId, StopId};

static NEXT_SNAPSHOT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Metadata attached to a built model.
#[derive(Debug, Clone)]
pub struct TransitModelMeta {
    /// Monotonically increasing stamp. A rebuild gets a fresh stamp, so a
    /// caller holding a cached model can tell it from the current snapshot.
    pub snapshot_version: u64,
    pub config: RoutingConfig,
}

/// The routing model. Queries only read it; picking up data changes means
/// building a replacement instance, never mutating this one.
#[derive(Debug, Clone)]
pub struct TransitModel {
    pub stops: StopIndex,
    pub routes: Vec<TransitRoute>,
    pub graph: TransitGraph,
    pub meta: TransitModelMeta,
}

/// Network size summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkStats {
    pub stops: usize,
    pub routes: usize,
    pub ride_arcs: usize,
    pub walking_arcs: usize,
}

impl TransitModel {
    pub(crate) fn next_snapshot_version() -> u64 {
        NEXT_SNAPSHOT_VERSION.fetch_add(1, Ordering::Relaxed)
    }

    /// Plans a trip between two stops.
    ///
    /// Returns `Ok(None)` when no connection exists, a degenerate
    /// zero-segment itinerary when both ids name the same stop, and
    /// [`Error::UnknownStop`] when an id is absent from the stop index.
    pub fn plan_trip(&self, from: StopId, to: StopId) -> Result<Option<Itinerary>, Error> {
        if !self.stops.contains(from) {
            return Err(Error::UnknownStop(from));
        }
        if !self.stops.contains(to) {
            return Err(Error::UnknownStop(to));
        }
        if from == to {
            return Ok(Some(Itinerary::degenerate(from)));
        }

        debug!("Planning trip {from} -> {to}");
        let Some(path) = find_path(&self.graph, from, to, &self.meta.config) else {
            return Ok(None);
        };
        Ok(Some(build_itinerary(&path, &self.graph, &self.meta.config)))
    }

    pub fn route(&self, id: RouteId) -> Option<&TransitRoute> {
        self.routes.iter().find(|route| route.id == id)
    }

    pub fn stats(&self) -> NetworkStats {
        let mut ride_arcs = 0;
        let mut walking_arcs = 0;
        for (_, _, edge) in self.graph.arcs() {
            if edge.walking {
                walking_arcs += 1;
            } else {
                ride_arcs += 1;
            }
        }
        NetworkStats {
            stops: self.stops.len(),
            routes: self.routes.len(),
            ride_arcs,
            walking_arcs,
        }
    }
}
