//! route-assigner core
//!
//! Clusters unassigned service locations onto available field workers and
//! orders each worker's stops.

pub mod traits;
pub mod haversine;
pub mod solver;
pub mod preview;
pub mod eligibility;
pub mod planner;
pub mod osrm;
