//! Route search and itinerary reconstruction.

pub mod dijkstra;
pub mod itinerary;

pub use dijkstra::{FoundPath, find_path};
pub use itinerary::{Itinerary, Segment, build_itinerary};
