//! Input filtering done before the engine runs.
//!
//! The engine trusts its input; these helpers decide which locations and
//! workers are eligible for a planning run.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::traits::{FieldWorker, Located, ServiceLocation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CoordinateError {
    NotFinite,
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl fmt::Display for CoordinateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateError::NotFinite => write!(f, "coordinate is NaN or infinite"),
            CoordinateError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {} outside [-90, 90]", lat)
            }
            CoordinateError::LongitudeOutOfRange(lng) => {
                write!(f, "longitude {} outside [-180, 180]", lng)
            }
        }
    }
}

impl std::error::Error for CoordinateError {}

/// Check a WGS84 position in degrees.
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), CoordinateError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(CoordinateError::NotFinite);
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CoordinateError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(CoordinateError::LongitudeOutOfRange(lng));
    }
    Ok(())
}

fn validate<P: Located>(item: &P) -> Result<(), CoordinateError> {
    let (lat, lng) = item.coordinates();
    validate_coordinates(lat, lng)
}

/// Split items into those with usable coordinates and those rejected.
pub fn partition_valid<P: Located>(items: &[P]) -> (Vec<&P>, Vec<(&P, CoordinateError)>) {
    let mut valid = Vec::new();
    let mut rejected = Vec::new();
    for item in items {
        match validate(item) {
            Ok(()) => valid.push(item),
            Err(err) => rejected.push((item, err)),
        }
    }
    (valid, rejected)
}

/// Workers that are online and report a usable position.
pub fn available_workers<W: FieldWorker>(workers: &[W]) -> Vec<&W> {
    workers
        .iter()
        .filter(|worker| worker.is_online() && validate(*worker).is_ok())
        .collect()
}

/// Locations with no active assignment yet.
pub fn unassigned_locations<'a, L: ServiceLocation>(
    locations: &'a [L],
    assigned: &HashSet<L::Id>,
) -> Vec<&'a L> {
    locations
        .iter()
        .filter(|location| !assigned.contains(location.id()))
        .collect()
}
