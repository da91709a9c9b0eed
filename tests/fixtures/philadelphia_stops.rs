//! Philadelphia collection stops for realistic fixtures.
//!
//! Coordinates are approximate public landmarks, grouped so that each group
//! sits clearly closer to one yard than to the others.

/// A named stop with coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Place {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Place {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Yards (worker start positions)
// ============================================================================

pub const NORTHEAST_YARD: Place = Place::new("Northeast Yard", 40.0450, -75.0600);
pub const SOUTH_YARD: Place = Place::new("South Yard", 39.9150, -75.1700);
pub const WEST_YARD: Place = Place::new("West Yard", 39.9550, -75.2250);

// ============================================================================
// Stops
// ============================================================================

pub const NORTHEAST: &[Place] = &[
    Place::new("Roosevelt Mall", 40.0487, -75.0561),
    Place::new("Pennypack Park", 40.0583, -75.0432),
    Place::new("Frankford Terminal", 40.0230, -75.0773),
    Place::new("Mayfair", 40.0371, -75.0540),
];

pub const SOUTH: &[Place] = &[
    Place::new("Citizens Bank Park", 39.9061, -75.1665),
    Place::new("FDR Park", 39.9035, -75.1800),
    Place::new("Passyunk Square", 39.9293, -75.1620),
    Place::new("Italian Market", 39.9386, -75.1579),
];

pub const WEST: &[Place] = &[
    Place::new("Clark Park", 39.9490, -75.2100),
    Place::new("Cobbs Creek", 39.9550, -75.2460),
    Place::new("Malcolm X Park", 39.9479, -75.2241),
    Place::new("Haddington", 39.9660, -75.2320),
];

/// Every stop, interleaved across neighbourhoods so input order does not
/// mirror the expected clusters.
pub fn all_stops() -> Vec<Place> {
    let mut stops = Vec::new();
    for i in 0..4 {
        stops.push(NORTHEAST[i]);
        stops.push(SOUTH[i]);
        stops.push(WEST[i]);
    }
    stops
}
