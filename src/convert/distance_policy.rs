use clap::ValueEnum;
use geo::{line_string, Haversine, Length, LineString, Point};
use serde::{Deserialize, Serialize};

/// Enumerates alternative ways to measure the distance between consecutive
/// stops when stop times must be interpolated.
#[derive(Serialize, Deserialize, Debug, ValueEnum, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistancePolicy {
    /// great-circle distance between stop coordinates
    #[default]
    Haversine,
    /// shape_dist_traveled differences from stop_times.txt; fails when the
    /// feed does not provide them
    ShapeDistance,
    /// shape_dist_traveled when every stop in the gap carries it, otherwise
    /// great-circle distance
    Fallback,
}

pub fn compute_haversine(src_point: Point<f64>, dst_point: Point<f64>) -> uom::si::f64::Length {
    let line: LineString<f64> = line_string![src_point.0, dst_point.0];
    uom::si::f64::Length::new::<uom::si::length::meter>(Haversine.length(&line))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let meters = compute_haversine(Point::new(0.0, 0.0), Point::new(0.0, 1.0))
            .get::<uom::si::length::meter>();
        // one degree of latitude is roughly 111 km
        assert!((meters - 111_000.0).abs() < 1_000.0);
    }

    #[test]
    fn test_haversine_zero_distance() {
        let meters = compute_haversine(Point::new(-105.0, 40.0), Point::new(-105.0, 40.0))
            .get::<uom::si::length::meter>();
        assert!(meters.abs() < 1e-9);
    }
}
