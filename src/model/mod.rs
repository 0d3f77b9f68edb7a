//! Data model for the transit network and its routing graph.

pub mod geometry;
pub mod network;
pub mod routes;
pub mod stops;
pub mod transit_model;

// Re-export of the main model structure
pub use transit_model::{NetworkStats, TransitModel, TransitModelMeta};

// Re-export of basic types for convenience
pub use network::{StopNode, TransitEdge, TransitGraph};
pub use routes::{TransitRoute, TransportKind};
pub use stops::{IndexedPoint, Stop, StopIndex};
