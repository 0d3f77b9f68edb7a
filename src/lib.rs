//! Route planning engine for municipal transit networks.
//!
//! Builds a weighted graph over transit stops from route definitions plus
//! synthesized walking connections between nearby stops, answers
//! stop-to-stop queries with a transfer-aware shortest-path search, and
//! reconstructs the result into ride and walk segments ready for display.
//!
//! The engine is pure computation over an immutable snapshot: build a
//! [`TransitModel`] once per data load with [`create_transit_model`], then
//! serve any number of [`TransitModel::plan_trip`] queries against it.
//! Picking up data changes means building a new model instance; in-flight
//! queries keep reading the old one.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use loading::{RoutingConfig, TransitSnapshot, create_transit_model};
pub use model::{Stop, StopIndex, TransitGraph, TransitModel, TransitRoute};
pub use routing::{Itinerary, Segment};

/// Stable external identifier of a transit stop.
pub type StopId = u64;

/// Stable external identifier of a transit route.
pub type RouteId = u64;
