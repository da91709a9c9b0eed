//! Route assignment engine.
//!
//! Clusters every location onto its nearest worker, then orders each cluster
//! with a nearest-neighbour walk from the worker's current position. Both steps
//! are greedy: a geographically central worker may collect a large share of the
//! stops, and the walk is not a minimal tour. An optional 2-opt pass can tighten
//! each walk afterwards.
//!
//! The provider is asked for one square matrix over every worker and location,
//! so memory grows with (workers + locations)^2. That is fine for a day's
//! unassigned stops but not for tens of thousands of points in one run.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::haversine::{haversine_miles, HaversineMatrix};
use crate::traits::{DistanceMatrixProvider, FieldWorker, Id, Located, ServiceLocation};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignOptions {
    /// Distances closer than this (miles) count as a tie.
    pub tie_tolerance_miles: f64,
    /// Run a 2-opt pass over each greedy walk.
    pub two_opt: bool,
    /// Maximum full 2-opt passes per route.
    pub max_improvement_passes: usize,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            tie_tolerance_miles: 1e-9,
            two_opt: false,
            max_improvement_passes: 100,
        }
    }
}

/// One location placed on one worker's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment<LocationId, WorkerId> {
    pub location_id: LocationId,
    pub employee_id: WorkerId,
    /// 0-based visiting position within the worker's route.
    pub route_order: usize,
    /// The worker group this location belongs to; always the employee id.
    pub cluster_id: WorkerId,
}

/// Assign locations to workers using haversine distances and default options.
///
/// Returns an empty list when there are no workers or no locations.
pub fn assign_locations_to_workers<L, W>(
    locations: &[L],
    workers: &[W],
) -> Vec<ClusterAssignment<L::Id, W::Id>>
where
    L: ServiceLocation,
    W: FieldWorker,
{
    assign_with(locations, workers, &HaversineMatrix, &AssignOptions::default())
}

pub fn assign_with<L, W, M>(
    locations: &[L],
    workers: &[W],
    matrix_provider: &M,
    options: &AssignOptions,
) -> Vec<ClusterAssignment<L::Id, W::Id>>
where
    L: ServiceLocation,
    W: FieldWorker,
    M: DistanceMatrixProvider + ?Sized,
{
    if workers.is_empty() {
        debug!(locations = locations.len(), "no workers available, nothing assigned");
        return Vec::new();
    }
    if locations.is_empty() {
        debug!(workers = workers.len(), "no locations to assign");
        return Vec::new();
    }

    let workers = dedupe_by_id(workers, |worker| worker.employee_id());
    let locations = dedupe_by_id(locations, |location| location.id());

    // Workers occupy the first indices of the table, locations follow.
    let points: Vec<(f64, f64)> = workers
        .iter()
        .map(|worker| worker.coordinates())
        .chain(locations.iter().map(|location| location.coordinates()))
        .collect();
    let table = DistanceTable::new(matrix_provider.matrix_for(&points), points);
    let offset = workers.len();

    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); workers.len()];
    for location_index in 0..locations.len() {
        let worker_index = nearest_worker(offset + location_index, &workers, &table, options);
        clusters[worker_index].push(offset + location_index);
    }

    let mut assignments = Vec::with_capacity(locations.len());
    for (worker_index, (worker, cluster)) in workers.iter().zip(clusters).enumerate() {
        if cluster.is_empty() {
            continue;
        }

        let mut order = nearest_neighbor_order(worker_index, cluster, &table, options, |point| {
            locations[point - offset].id()
        });
        if options.two_opt {
            two_opt_improve(worker_index, &mut order, &table, options.max_improvement_passes);
        }

        debug!(
            employee_id = ?worker.employee_id(),
            stops = order.len(),
            length = table.path_length(worker_index, &order),
            "route ordered"
        );

        for (route_order, point) in order.into_iter().enumerate() {
            assignments.push(ClusterAssignment {
                location_id: locations[point - offset].id().clone(),
                employee_id: worker.employee_id().clone(),
                route_order,
                cluster_id: worker.employee_id().clone(),
            });
        }
    }

    assignments
}

/// Distances between table points.
///
/// A provider matrix of the wrong shape is replaced wholesale by haversine.
/// Individual non-finite cells (unreachable pairs) use haversine for that pair.
struct DistanceTable {
    matrix: Vec<Vec<f64>>,
    points: Vec<(f64, f64)>,
}

impl DistanceTable {
    fn new(matrix: Vec<Vec<f64>>, points: Vec<(f64, f64)>) -> Self {
        let n = points.len();
        if matrix.len() != n || matrix.iter().any(|row| row.len() != n) {
            warn!(
                expected = n,
                rows = matrix.len(),
                "distance matrix has wrong shape, using haversine for the whole run"
            );
            let matrix = HaversineMatrix.matrix_for(&points);
            return Self { matrix, points };
        }
        Self { matrix, points }
    }

    fn between(&self, from: usize, to: usize) -> f64 {
        match self.matrix.get(from).and_then(|row| row.get(to)) {
            Some(value) if value.is_finite() => *value,
            _ => haversine_miles(self.points[from], self.points[to]),
        }
    }

    /// Length of the open path starting at `start` and visiting `order`.
    fn path_length(&self, start: usize, order: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut previous = start;
        for &point in order {
            total += self.between(previous, point);
            previous = point;
        }
        total
    }
}

fn dedupe_by_id<'a, T, I, F>(items: &'a [T], id_of: F) -> Vec<&'a T>
where
    I: Id + 'a,
    F: Fn(&'a T) -> &'a I,
{
    let mut seen: HashSet<&I> = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    for item in items {
        let id = id_of(item);
        if seen.insert(id) {
            unique.push(item);
        } else {
            debug!(id = ?id, "duplicate id in input, keeping first occurrence");
        }
    }
    unique
}

/// Index of the worker closest to `point`; ties go to the smaller employee id.
fn nearest_worker<W: FieldWorker>(
    point: usize,
    workers: &[&W],
    table: &DistanceTable,
    options: &AssignOptions,
) -> usize {
    let mut best = 0;
    let mut best_distance = table.between(0, point);

    for (worker_index, worker) in workers.iter().enumerate().skip(1) {
        let distance = table.between(worker_index, point);
        let closer = distance < best_distance - options.tie_tolerance_miles;
        let tied = (distance - best_distance).abs() <= options.tie_tolerance_miles;
        if closer || (tied && worker.employee_id() < workers[best].employee_id()) {
            best = worker_index;
            best_distance = distance;
        }
    }

    best
}

/// Greedy walk from `start`, always stepping to the closest unvisited point.
/// Ties go to the smaller location id.
fn nearest_neighbor_order<'a, I, F>(
    start: usize,
    mut unvisited: Vec<usize>,
    table: &DistanceTable,
    options: &AssignOptions,
    id_of: F,
) -> Vec<usize>
where
    I: Id + 'a,
    F: Fn(usize) -> &'a I,
{
    let mut order = Vec::with_capacity(unvisited.len());
    let mut current = start;

    while !unvisited.is_empty() {
        let mut best = 0;
        let mut best_distance = table.between(current, unvisited[0]);
        for (candidate_index, &candidate) in unvisited.iter().enumerate().skip(1) {
            let distance = table.between(current, candidate);
            let closer = distance < best_distance - options.tie_tolerance_miles;
            let tied = (distance - best_distance).abs() <= options.tie_tolerance_miles;
            if closer || (tied && id_of(candidate) < id_of(unvisited[best])) {
                best = candidate_index;
                best_distance = distance;
            }
        }
        current = unvisited.remove(best);
        order.push(current);
    }

    order
}

/// 2-opt: reverse segments of the open path while that shortens it.
/// The start point stays fixed. Each pass tries every segment start once and
/// applies the best shortening reversal found for it.
fn two_opt_improve(start: usize, order: &mut [usize], table: &DistanceTable, max_passes: usize) {
    let n = order.len();
    if n < 2 {
        return;
    }

    for _ in 0..max_passes {
        let mut improved = false;
        for i in 0..n - 1 {
            if let Some(j) = best_reversal_from(start, order, i, table) {
                order[i..=j].reverse();
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
}

/// End index `j` of the best reversal of `order[i..=j]`, if any shortens the path.
///
/// The change is taken from the two boundary edges plus running sums of the
/// segment interior walked forwards and backwards, so asymmetric matrices are
/// handled and each candidate costs O(1).
fn best_reversal_from(start: usize, order: &[usize], i: usize, table: &DistanceTable) -> Option<usize> {
    let before = if i == 0 { start } else { order[i - 1] };
    let first = order[i];
    let head = table.between(before, first);

    let mut forward = 0.0;
    let mut backward = 0.0;
    let mut best: Option<(usize, f64)> = None;

    for j in i + 1..order.len() {
        forward += table.between(order[j - 1], order[j]);
        backward += table.between(order[j], order[j - 1]);

        let last = order[j];
        let (old_tail, new_tail) = match order.get(j + 1) {
            Some(&after) => (table.between(last, after), table.between(first, after)),
            None => (0.0, 0.0),
        };

        let delta = (table.between(before, last) + backward + new_tail) - (head + forward + old_tail);
        if delta < -1e-9 && best.is_none_or(|(_, best_delta)| delta < best_delta) {
            best = Some((j, delta));
        }
    }

    best.map(|(j, _)| j)
}
