//! Read-only route previews built from a finished assignment.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::haversine::calculate_route_distance;
use crate::solver::ClusterAssignment;
use crate::traits::{FieldWorker, Located, ServiceLocation};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewStop<LocationId> {
    pub location_id: LocationId,
    pub address: String,
    pub route_order: usize,
    pub coordinates: (f64, f64),
}

/// One worker's ordered stop list with its haversine length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePreview<LocationId, WorkerId> {
    pub employee_id: WorkerId,
    pub display_name: Option<String>,
    pub stops: Vec<PreviewStop<LocationId>>,
    pub total_distance_miles: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanSummary {
    pub assigned_locations: usize,
    pub workers_with_stops: usize,
    pub total_distance_miles: f64,
}

/// Group assignments per worker, in worker input order.
///
/// Assignments that reference an unknown location or worker are dropped.
pub fn build_previews<L, W>(
    assignments: &[ClusterAssignment<L::Id, W::Id>],
    locations: &[L],
    workers: &[W],
) -> Vec<RoutePreview<L::Id, W::Id>>
where
    L: ServiceLocation,
    W: FieldWorker,
{
    let location_by_id: HashMap<&L::Id, &L> = locations
        .iter()
        .rev()
        .map(|location| (location.id(), location))
        .collect();

    let mut stops_by_worker: HashMap<&W::Id, Vec<PreviewStop<L::Id>>> = HashMap::new();
    for assignment in assignments {
        let Some(location) = location_by_id.get(&assignment.location_id) else {
            debug!(location_id = ?assignment.location_id, "assignment for unknown location skipped");
            continue;
        };
        stops_by_worker
            .entry(&assignment.employee_id)
            .or_default()
            .push(PreviewStop {
                location_id: assignment.location_id.clone(),
                address: location.address().to_string(),
                route_order: assignment.route_order,
                coordinates: location.coordinates(),
            });
    }

    let mut previews = Vec::new();
    for worker in workers {
        let Some(mut stops) = stops_by_worker.remove(worker.employee_id()) else {
            continue;
        };
        stops.sort_by_key(|stop| stop.route_order);

        let path: Vec<(f64, f64)> = stops.iter().map(|stop| stop.coordinates).collect();
        previews.push(RoutePreview {
            employee_id: worker.employee_id().clone(),
            display_name: worker.display_name().map(str::to_string),
            stops,
            total_distance_miles: calculate_route_distance(&path),
        });
    }

    for employee_id in stops_by_worker.keys() {
        debug!(employee_id = ?employee_id, "assignments for unknown worker skipped");
    }

    previews
}

pub fn summarize<LocationId, WorkerId>(previews: &[RoutePreview<LocationId, WorkerId>]) -> PlanSummary {
    PlanSummary {
        assigned_locations: previews.iter().map(|preview| preview.stops.len()).sum(),
        workers_with_stops: previews.iter().filter(|preview| !preview.stops.is_empty()).count(),
        total_distance_miles: previews.iter().map(|preview| preview.total_distance_miles).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::haversine_miles;

    struct Bin {
        id: u32,
        address: &'static str,
        at: (f64, f64),
    }

    impl Located for Bin {
        fn coordinates(&self) -> (f64, f64) {
            self.at
        }
    }

    impl ServiceLocation for Bin {
        type Id = u32;

        fn id(&self) -> &u32 {
            &self.id
        }

        fn address(&self) -> &str {
            self.address
        }
    }

    struct Driver {
        id: u32,
        name: Option<&'static str>,
    }

    impl Located for Driver {
        fn coordinates(&self) -> (f64, f64) {
            (0.0, 0.0)
        }
    }

    impl FieldWorker for Driver {
        type Id = u32;

        fn employee_id(&self) -> &u32 {
            &self.id
        }

        fn is_online(&self) -> bool {
            true
        }

        fn display_name(&self) -> Option<&str> {
            self.name
        }
    }

    fn assignment(location_id: u32, employee_id: u32, route_order: usize) -> ClusterAssignment<u32, u32> {
        ClusterAssignment {
            location_id,
            employee_id,
            route_order,
            cluster_id: employee_id,
        }
    }

    fn bins() -> Vec<Bin> {
        vec![
            Bin { id: 1, address: "12 Elm St", at: (0.0, 0.0) },
            Bin { id: 2, address: "40 Oak Ave", at: (0.0, 1.0) },
            Bin { id: 3, address: "7 Pine Rd", at: (0.0, 2.0) },
        ]
    }

    #[test]
    fn test_stops_sorted_by_route_order() {
        let drivers = [Driver { id: 9, name: Some("Dana") }];
        let assignments = [assignment(3, 9, 2), assignment(1, 9, 0), assignment(2, 9, 1)];

        let previews = build_previews(&assignments, &bins(), &drivers);
        assert_eq!(previews.len(), 1);
        let ids: Vec<u32> = previews[0].stops.iter().map(|stop| stop.location_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(previews[0].stops[1].address, "40 Oak Ave");
        assert_eq!(previews[0].display_name.as_deref(), Some("Dana"));

        let expected = haversine_miles((0.0, 0.0), (0.0, 1.0)) + haversine_miles((0.0, 1.0), (0.0, 2.0));
        assert!((previews[0].total_distance_miles - expected).abs() < 1e-9);
    }

    #[test]
    fn test_previews_follow_worker_order_and_skip_idle() {
        let drivers = [
            Driver { id: 5, name: None },
            Driver { id: 6, name: None },
            Driver { id: 7, name: None },
        ];
        let assignments = [assignment(1, 7, 0), assignment(2, 5, 0)];

        let previews = build_previews(&assignments, &bins(), &drivers);
        let workers: Vec<u32> = previews.iter().map(|preview| preview.employee_id).collect();
        assert_eq!(workers, vec![5, 7]);
        assert!(previews.iter().all(|preview| preview.total_distance_miles == 0.0));
    }

    #[test]
    fn test_unknown_ids_are_dropped() {
        let drivers = [Driver { id: 5, name: None }];
        let assignments = [assignment(1, 5, 0), assignment(99, 5, 1), assignment(2, 42, 0)];

        let previews = build_previews(&assignments, &bins(), &drivers);
        assert_eq!(previews.len(), 1);
        assert_eq!(previews[0].stops.len(), 1);
    }

    #[test]
    fn test_summary_totals() {
        let drivers = [Driver { id: 5, name: None }, Driver { id: 6, name: None }];
        let assignments = [assignment(1, 5, 0), assignment(2, 5, 1), assignment(3, 6, 0)];

        let previews = build_previews(&assignments, &bins(), &drivers);
        let summary = summarize(&previews);
        assert_eq!(summary.assigned_locations, 3);
        assert_eq!(summary.workers_with_stops, 2);
        assert!((summary.total_distance_miles - haversine_miles((0.0, 0.0), (0.0, 1.0))).abs() < 1e-9);
    }

    #[test]
    fn test_empty_assignments() {
        let drivers = [Driver { id: 5, name: None }];
        let previews = build_previews::<Bin, Driver>(&[], &bins(), &drivers);
        assert!(previews.is_empty());
        assert_eq!(summarize(&previews).assigned_locations, 0);
    }
}
