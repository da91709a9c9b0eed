//! Test fixtures for route-assigner.
//!
//! Provides realistic test data:
//! - Philadelphia collection stops grouped by neighbourhood
//! - Yard positions used as worker start points

pub mod philadelphia_stops;

pub use philadelphia_stops::*;
