//! Planning run: filter the snapshot, assign, and build the preview an
//! operator reviews before the caller commits the assignments.

use std::collections::HashSet;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tracing::{info, warn};

use crate::eligibility::{available_workers, partition_valid, unassigned_locations, CoordinateError};
use crate::preview::{build_previews, summarize, PlanSummary, RoutePreview};
use crate::solver::{assign_with, AssignOptions, ClusterAssignment};
use crate::traits::{DistanceMatrixProvider, FieldWorker, ServiceLocation};

/// Why a run produced nothing to commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// No valid location is waiting for assignment.
    NoWork,
    /// Locations are waiting but no worker is available.
    NoCapacity,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::NoWork => write!(f, "no unassigned locations to route"),
            PlanError::NoCapacity => write!(f, "no available workers"),
        }
    }
}

impl std::error::Error for PlanError {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLocation<LocationId> {
    pub location_id: LocationId,
    pub reason: CoordinateError,
}

/// Result of one planning run, ready to preview and persist.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRun<LocationId, WorkerId> {
    /// Unix seconds when the run was computed.
    pub ran_at: i64,
    pub assignments: Vec<ClusterAssignment<LocationId, WorkerId>>,
    pub previews: Vec<RoutePreview<LocationId, WorkerId>>,
    pub summary: PlanSummary,
    pub skipped: Vec<SkippedLocation<LocationId>>,
}

pub fn plan_run<L, W, M>(
    locations: &[L],
    workers: &[W],
    already_assigned: &HashSet<L::Id>,
    matrix_provider: &M,
    options: &AssignOptions,
) -> Result<AssignmentRun<L::Id, W::Id>, PlanError>
where
    L: ServiceLocation,
    W: FieldWorker,
    M: DistanceMatrixProvider + ?Sized,
{
    let open = unassigned_locations(locations, already_assigned);
    let (valid, rejected) = partition_valid(&open);

    let skipped: Vec<SkippedLocation<L::Id>> = rejected
        .into_iter()
        .map(|(location, reason)| {
            warn!(location_id = ?location.id(), %reason, "location skipped");
            SkippedLocation {
                location_id: location.id().clone(),
                reason,
            }
        })
        .collect();

    if valid.is_empty() {
        return Err(PlanError::NoWork);
    }

    let available = available_workers(workers);
    if available.is_empty() {
        return Err(PlanError::NoCapacity);
    }

    let assignments = assign_with(&valid, &available, matrix_provider, options);
    let previews = build_previews(&assignments, &valid, &available);
    let summary = summarize(&previews);

    info!(
        locations = summary.assigned_locations,
        workers = summary.workers_with_stops,
        skipped = skipped.len(),
        total_distance_miles = summary.total_distance_miles,
        "route assignment planned"
    );

    Ok(AssignmentRun {
        ran_at: unix_now(),
        assignments,
        previews,
        summary,
        skipped,
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
