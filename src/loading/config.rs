use serde::Deserialize;

/// Meters of equivalent travel charged per minute of penalty time.
const METERS_PER_PENALTY_MINUTE: f64 = 1000.0;

/// Engine tuning knobs.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoutingConfig {
    /// Longest synthesized pedestrian hop between stops, meters
    pub max_walking_distance_meters: f64,
    /// Interchange time charged per forced transfer, minutes
    pub transfer_penalty_minutes: f64,
    /// Flat search-cost surcharge on any walking hop, meters
    pub walking_penalty_meters: f64,
    /// Cruise speed used for the time estimate, km/h
    pub average_speed_kmh: f64,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            max_walking_distance_meters: 300.0,
            transfer_penalty_minutes: 3.0,
            walking_penalty_meters: 200.0,
            average_speed_kmh: 20.0,
        }
    }
}

impl RoutingConfig {
    /// Transfer penalty as the distance-equivalent used in search cost; one
    /// minute counts as a kilometer.
    pub(crate) fn transfer_penalty_meters(&self) -> f64 {
        self.transfer_penalty_minutes * METERS_PER_PENALTY_MINUTE
    }
}
