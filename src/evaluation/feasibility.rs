//! Static feasibility checks over a raw plan.

use crate::models::{DecodedPlan, Instance, Plan, Rule, Violation, ViolationType};

/// Outcome of [`FeasibilityChecker::check`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeasibilityVerdict {
    /// Every rule holds; carries the decoded plan for simulation.
    Feasible(DecodedPlan),
    /// The first rule that failed.
    Infeasible(Violation),
}

impl FeasibilityVerdict {
    /// Returns `true` if every rule holds.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }

    /// The violation, if the plan was rejected.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Feasible(_) => None,
            Self::Infeasible(v) => Some(v),
        }
    }

    /// The decoded plan, if the plan was accepted.
    pub fn decoded(&self) -> Option<&DecodedPlan> {
        match self {
            Self::Feasible(d) => Some(d),
            Self::Infeasible(_) => None,
        }
    }

    /// Converts into a `Result`, keeping the decoded plan or the violation.
    pub fn into_result(self) -> Result<DecodedPlan, Violation> {
        match self {
            Self::Feasible(d) => Ok(d),
            Self::Infeasible(v) => Err(v),
        }
    }
}

/// Checks plans against the routing, completeness, and drone-trip rules.
///
/// The rules run in a fixed order, cheapest and most structural first, and
/// checking stops at the first violation:
///
/// 1. truck route ([`check_truck_route`](Self::check_truck_route)),
/// 2. completeness ([`check_completeness`](Self::check_completeness)),
/// 3. structural consistency ([`check_structure`](Self::check_structure)),
/// 4. per-drone trips ([`check_drone_trips`](Self::check_drone_trips)).
///
/// # Examples
///
/// ```
/// use u_strpd::distance::DistanceMatrix;
/// use u_strpd::evaluation::FeasibilityChecker;
/// use u_strpd::models::{Instance, Plan, Rule};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 4.0, 6.0],
///     vec![4.0, 0.0, 3.0],
///     vec![6.0, 3.0, 0.0],
/// ]).unwrap();
/// let instance = Instance::new(dm.clone(), dm, 1, 10.0).unwrap();
/// let checker = FeasibilityChecker::new(&instance);
///
/// assert!(checker.check(&Plan::truck_only(vec![0, 1, 2, 0])).is_feasible());
///
/// let verdict = checker.check(&Plan::truck_only(vec![0, 1, 0]));
/// assert_eq!(verdict.violation().unwrap().rule(), Rule::Completeness);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FeasibilityChecker<'a> {
    instance: &'a Instance,
}

impl<'a> FeasibilityChecker<'a> {
    /// Creates a checker for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Runs every rule in order and returns the first violation, or the
    /// decoded plan if all hold.
    pub fn check(&self, plan: &Plan) -> FeasibilityVerdict {
        let outcome = self
            .check_truck_route(plan)
            .and_then(|()| self.check_completeness(plan))
            .and_then(|()| self.check_structure(plan))
            .and_then(|decoded| {
                self.check_drone_trips(&decoded)?;
                Ok(decoded)
            });
        match outcome {
            Ok(decoded) => FeasibilityVerdict::Feasible(decoded),
            Err(v) => FeasibilityVerdict::Infeasible(v),
        }
    }

    /// Returns `true` if every rule holds.
    pub fn is_feasible(&self, plan: &Plan) -> bool {
        self.check(plan).is_feasible()
    }

    /// Truck route starts and ends at the depot, has no interior depot, and
    /// only names nodes of the instance.
    pub fn check_truck_route(&self, plan: &Plan) -> Result<(), Violation> {
        let route = plan.truck_route();
        let fail = |kind| Err(Violation::new(Rule::TruckRoute, kind));

        let (first, last) = match route {
            [first, .., last] => (*first, *last),
            _ => return fail(ViolationType::RouteTooShort { len: route.len() }),
        };
        if !self.instance.is_depot(first) || !self.instance.is_depot(last) {
            return fail(ViolationType::RouteEndpoints { first, last });
        }
        let n_nodes = self.instance.n_nodes();
        if let Some((position, &node)) = route.iter().enumerate().find(|&(_, &n)| n >= n_nodes) {
            return fail(ViolationType::NodeOutOfRange { position, node });
        }
        let interior = &route[1..route.len() - 1];
        if let Some(i) = interior.iter().position(|&n| self.instance.is_depot(n)) {
            return fail(ViolationType::InteriorDepot { position: i + 1 });
        }
        Ok(())
    }

    /// Shorthand for [`check_truck_route`](Self::check_truck_route).
    pub fn is_truck_route_feasible(&self, plan: &Plan) -> bool {
        self.check_truck_route(plan).is_ok()
    }

    /// Every customer is served exactly once by truck or drone, the depot is
    /// never a drone customer, and no drone sequence has more than
    /// `n_drones - 1` separators.
    ///
    /// Truck nodes outside the instance are reported rather than counted.
    pub fn check_completeness(&self, plan: &Plan) -> Result<(), Violation> {
        let fail = |kind| Err(Violation::new(Rule::Completeness, kind));
        let depot = self.instance.depot() as i64;
        let n_nodes = self.instance.n_nodes();

        let drone_customers = plan
            .drone_customers()
            .iter()
            .copied()
            .filter(|&c| c != Plan::SEPARATOR);
        let mut counts = vec![0usize; n_nodes];
        for customer in drone_customers {
            if customer == depot {
                return fail(ViolationType::DepotInDroneCustomers);
            }
            match usize::try_from(customer) {
                Ok(c) if c < n_nodes => counts[c] += 1,
                _ => return fail(ViolationType::UnknownCustomer { customer }),
            }
        }

        let max = self.instance.max_separators();
        let sequences = [
            ("drone_customers", plan.drone_customers()),
            ("launch_cells", plan.launch_cells()),
            ("reconvene_cells", plan.reconvene_cells()),
        ];
        for (sequence, values) in sequences {
            let count = plan.separator_count(values);
            if count > max {
                return fail(ViolationType::TooManySeparators {
                    sequence,
                    count,
                    max,
                });
            }
        }

        for (i, &node) in plan.truck_customers().iter().enumerate() {
            match counts.get_mut(node) {
                Some(count) => *count += 1,
                None => {
                    return fail(ViolationType::NodeOutOfRange {
                        position: i + 1,
                        node,
                    })
                }
            }
        }
        for customer in self.instance.customers() {
            match counts[customer] {
                1 => {}
                0 => return fail(ViolationType::MissingCustomer { customer }),
                count => return fail(ViolationType::DuplicateCustomer { customer, count }),
            }
        }
        Ok(())
    }

    /// Shorthand for [`check_completeness`](Self::check_completeness).
    pub fn is_complete(&self, plan: &Plan) -> bool {
        self.check_completeness(plan).is_ok()
    }

    /// Decodes the drone sequences and checks every trip launches strictly
    /// before it reconvenes.
    ///
    /// Decoding failures (misaligned separators, pair-count mismatches, cells
    /// outside the route) are reported as [`ViolationType::Malformed`].
    pub fn check_structure(&self, plan: &Plan) -> Result<DecodedPlan, Violation> {
        let decoded = DecodedPlan::decode(plan, self.instance).map_err(|e| {
            Violation::new(Rule::StructuralConsistency, ViolationType::Malformed(e))
        })?;
        if let Some((_, trip)) = decoded
            .all_trips()
            .find(|(_, t)| t.launch_cell >= t.reconvene_cell)
        {
            return Err(Violation::new(
                Rule::StructuralConsistency,
                ViolationType::LaunchNotBeforeReconvene {
                    customer: trip.customer,
                    launch_cell: trip.launch_cell,
                    reconvene_cell: trip.reconvene_cell,
                },
            ));
        }
        Ok(decoded)
    }

    /// Per drone: every trip's flight time is within range, and each trip
    /// launches no earlier than the previous one reconvenes.
    pub fn check_drone_trips(&self, decoded: &DecodedPlan) -> Result<(), Violation> {
        let fail = |kind| Err(Violation::new(Rule::DroneTrips, kind));
        let flight_range = self.instance.flight_range();

        for drone in 0..decoded.num_drones() {
            let trips = decoded.trips(drone);
            for trip in trips {
                let flight_time = trip.flight_time(self.instance);
                if flight_time > flight_range {
                    return fail(ViolationType::FlightRangeExceeded {
                        drone,
                        customer: trip.customer,
                        flight_time,
                        flight_range,
                    });
                }
            }
            for pair in trips.windows(2) {
                if pair[1].launch_cell < pair[0].reconvene_cell {
                    return fail(ViolationType::OverlappingTrips {
                        drone,
                        reconvene_cell: pair[0].reconvene_cell,
                        next_launch_cell: pair[1].launch_cell,
                    });
                }
            }
        }
        Ok(())
    }
}
