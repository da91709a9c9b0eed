//! Haversine distances.
//!
//! Great-circle distance in miles on a sphere of fixed radius. This is the only
//! distance used for route totals, so previews stay comparable whichever matrix
//! provider drove the assignment.

use rayon::prelude::*;

use crate::traits::{DistanceMatrixProvider, Located};

/// Mean Earth radius in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Great-circle distance between two (lat, lng) points in miles.
pub fn haversine_miles(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Total distance in miles visiting `ordered` front to back.
///
/// Empty and single-stop sequences have zero length.
pub fn calculate_route_distance<P: Located>(ordered: &[P]) -> f64 {
    ordered
        .windows(2)
        .map(|pair| haversine_miles(pair[0].coordinates(), pair[1].coordinates()))
        .sum()
}

/// Haversine-based distance matrix provider.
///
/// Ignores the road network but is always available.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl HaversineMatrix {
    pub fn new() -> Self {
        Self
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        points
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                points
                    .iter()
                    .enumerate()
                    .map(|(j, to)| if i == j { 0.0 } else { haversine_miles(*from, *to) })
                    .collect::<Vec<f64>>()
            })
            .collect()
    }
}
