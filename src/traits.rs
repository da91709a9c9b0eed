//! Core domain traits for route assignment.
//!
//! Kept minimal so the surrounding application can implement them for its own
//! location and employee records.

use std::fmt::Debug;
use std::hash::Hash;

/// Unique identifier for locations and workers.
///
/// `Ord` is required for deterministic tie-breaking.
pub trait Id: Clone + Eq + Ord + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Ord + Hash + Debug {}

/// Anything with a WGS84 position (lat, lng) in degrees.
pub trait Located {
    fn coordinates(&self) -> (f64, f64);
}

impl<T: Located + ?Sized> Located for &T {
    fn coordinates(&self) -> (f64, f64) {
        (**self).coordinates()
    }
}

impl Located for (f64, f64) {
    fn coordinates(&self) -> (f64, f64) {
        *self
    }
}

/// A customer service location awaiting collection.
pub trait ServiceLocation: Located {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    /// Display address. Not used for routing.
    fn address(&self) -> &str;
}

impl<T: ServiceLocation + ?Sized> ServiceLocation for &T {
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        (**self).id()
    }

    fn address(&self) -> &str {
        (**self).address()
    }
}

/// A field worker snapshot; `coordinates()` is the worker's current position.
pub trait FieldWorker: Located {
    type Id: Id;

    fn employee_id(&self) -> &Self::Id;

    fn is_online(&self) -> bool;

    fn display_name(&self) -> Option<&str>;
}

impl<T: FieldWorker + ?Sized> FieldWorker for &T {
    type Id = T::Id;

    fn employee_id(&self) -> &Self::Id {
        (**self).employee_id()
    }

    fn is_online(&self) -> bool {
        (**self).is_online()
    }

    fn display_name(&self) -> Option<&str> {
        (**self).display_name()
    }
}

/// Provides a distance matrix (miles) for a set of points.
///
/// The matrix is indexed by the provided point order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, points: &[(f64, f64)]) -> Vec<Vec<f64>>;
}

impl<M: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &M {
    fn matrix_for(&self, points: &[(f64, f64)]) -> Vec<Vec<f64>> {
        (**self).matrix_for(points)
    }
}
