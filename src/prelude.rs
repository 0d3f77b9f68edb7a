// Re-export of key components
pub use crate::error::Error;
pub use crate::loading::{RoutingConfig, TransitSnapshot, create_transit_model};
pub use crate::model::{
    NetworkStats, Stop, StopIndex, TransitGraph, TransitModel, TransitRoute, TransportKind,
};
pub use crate::routing::{FoundPath, Itinerary, Segment, find_path};

// Core identifier types
pub use crate::RouteId;
pub use crate::StopId;
