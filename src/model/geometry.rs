//! Great-circle distance over stop coordinates.

use geo::{Distance, HaversineMeasure, Point};

/// Earth radius used for every distance in the engine, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two WGS84 points, in meters.
pub fn haversine_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METERS).distance(a, b)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::Point;

    use super::*;

    #[test]
    fn test_meridian_distance() {
        // One hundredth of a degree of latitude is ~1112 m on a 6371 km sphere
        let a = Point::new(68.78, 38.60);
        let b = Point::new(68.78, 38.61);
        assert_relative_eq!(haversine_distance(a, b), 1_111.949, max_relative = 1e-4);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = Point::new(68.77741, 38.619821);
        let b = Point::new(68.781125, 38.616789);
        assert_relative_eq!(
            haversine_distance(a, b),
            haversine_distance(b, a),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zero_distance() {
        let p = Point::new(68.78, 38.60);
        assert_eq!(haversine_distance(p, p), 0.0);
    }
}
