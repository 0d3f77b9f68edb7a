//! Snapshot intake: parsing the records handed over by the data-loading
//! layer and building the routing model from them.

mod builder;
mod config;
mod de;
mod snapshot;

pub use builder::create_transit_model;
pub use config::RoutingConfig;
pub use snapshot::{RouteRecord, StopRecord, TransitSnapshot};
