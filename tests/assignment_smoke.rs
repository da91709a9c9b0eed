use route_assigner::solver::assign_locations_to_workers;
use route_assigner::traits::{FieldWorker, Located, ServiceLocation};

#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
struct Id(&'static str);

#[derive(Clone, Debug)]
struct MockLocation {
    id: Id,
    location: (f64, f64),
}

impl Located for MockLocation {
    fn coordinates(&self) -> (f64, f64) {
        self.location
    }
}

impl ServiceLocation for MockLocation {
    type Id = Id;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn address(&self) -> &str {
        "unknown"
    }
}

#[derive(Clone, Debug)]
struct MockWorker {
    id: Id,
    location: (f64, f64),
}

impl Located for MockWorker {
    fn coordinates(&self) -> (f64, f64) {
        self.location
    }
}

impl FieldWorker for MockWorker {
    type Id = Id;

    fn employee_id(&self) -> &Self::Id {
        &self.id
    }

    fn is_online(&self) -> bool {
        true
    }

    fn display_name(&self) -> Option<&str> {
        None
    }
}

#[test]
fn assigns_to_closest_worker() {
    let locations = vec![
        MockLocation {
            id: Id("v1"),
            location: (1.0, 0.0),
        },
        MockLocation {
            id: Id("v2"),
            location: (-2.0, 0.0),
        },
    ];

    let workers = vec![
        MockWorker {
            id: Id("a"),
            location: (1.5, 0.0),
        },
        MockWorker {
            id: Id("b"),
            location: (-1.5, 0.0),
        },
    ];

    let result = assign_locations_to_workers(&locations, &workers);

    assert_eq!(result.len(), 2);
    let v1 = result.iter().find(|assignment| assignment.location_id == Id("v1")).unwrap();
    let v2 = result.iter().find(|assignment| assignment.location_id == Id("v2")).unwrap();
    assert_eq!(v1.employee_id, Id("a"));
    assert_eq!(v2.employee_id, Id("b"));
    assert_eq!(v1.route_order, 0);
    assert_eq!(v2.route_order, 0);
}
