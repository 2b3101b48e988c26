//! Feasibility rule and violation types.

use std::fmt;

use crate::error::DecodeError;

/// The feasibility rule a violation belongs to, in checking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    /// Truck starts and ends at the depot with valid interior nodes.
    TruckRoute,
    /// Every customer served exactly once; separator limits.
    Completeness,
    /// Drone sequences decode cleanly; launch precedes reconvene.
    StructuralConsistency,
    /// Static flight range and per-drone trip ordering.
    DroneTrips,
    /// Flight range re-checked against the simulated timeline.
    DynamicFlightRange,
}

/// A type of rule violation in a plan.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// The truck route has fewer than two nodes.
    RouteTooShort {
        /// Route length.
        len: usize,
    },
    /// The truck route does not start and end at the depot.
    RouteEndpoints {
        /// First node.
        first: usize,
        /// Last node.
        last: usize,
    },
    /// A truck route node is not a node of the instance.
    NodeOutOfRange {
        /// Zero-based route position.
        position: usize,
        /// Offending node.
        node: usize,
    },
    /// The depot appears inside the truck route.
    InteriorDepot {
        /// Zero-based route position.
        position: usize,
    },
    /// The depot is listed as a drone customer.
    DepotInDroneCustomers,
    /// A drone customer is not a customer of the instance.
    UnknownCustomer {
        /// Offending value.
        customer: i64,
    },
    /// A drone sequence has more separators than the fleet allows.
    TooManySeparators {
        /// Sequence name.
        sequence: &'static str,
        /// Separators found.
        count: usize,
        /// `n_drones - 1`.
        max: usize,
    },
    /// A customer is served by neither truck nor drone.
    MissingCustomer {
        /// Customer ID.
        customer: usize,
    },
    /// A customer is served more than once.
    DuplicateCustomer {
        /// Customer ID.
        customer: usize,
        /// Times served.
        count: usize,
    },
    /// The drone sequences could not be decoded.
    Malformed(DecodeError),
    /// A trip lands at or before its launch position.
    LaunchNotBeforeReconvene {
        /// Drone customer.
        customer: usize,
        /// 1-based launch cell.
        launch_cell: usize,
        /// 1-based reconvene cell.
        reconvene_cell: usize,
    },
    /// A trip's flight time exceeds the flight range.
    FlightRangeExceeded {
        /// Drone index.
        drone: usize,
        /// Drone customer.
        customer: usize,
        /// Flight time compared against the range (wait included when the
        /// simulator's policy says so).
        flight_time: f64,
        /// Instance flight range.
        flight_range: f64,
    },
    /// A drone launches before landing from its previous trip.
    OverlappingTrips {
        /// Drone index.
        drone: usize,
        /// Reconvene cell of the earlier trip.
        reconvene_cell: usize,
        /// Launch cell of the next trip.
        next_launch_cell: usize,
    },
}

/// A rule violation found while evaluating a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Rule that failed.
    pub rule: Rule,
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(rule: Rule, kind: ViolationType) -> Self {
        Self { rule, kind }
    }

    /// Rule that failed.
    pub fn rule(&self) -> Rule {
        self.rule
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationType::RouteTooShort { len } => {
                write!(f, "truck route has {len} nodes, need at least 2")
            }
            ViolationType::RouteEndpoints { first, last } => {
                write!(f, "truck route runs {first}..{last}, must start and end at depot")
            }
            ViolationType::NodeOutOfRange { position, node } => {
                write!(f, "truck route position {position} holds unknown node {node}")
            }
            ViolationType::InteriorDepot { position } => {
                write!(f, "depot revisited at truck route position {position}")
            }
            ViolationType::DepotInDroneCustomers => write!(f, "depot listed as drone customer"),
            ViolationType::UnknownCustomer { customer } => {
                write!(f, "unknown drone customer {customer}")
            }
            ViolationType::TooManySeparators {
                sequence,
                count,
                max,
            } => write!(f, "{sequence} has {count} separators, at most {max} allowed"),
            ViolationType::MissingCustomer { customer } => {
                write!(f, "customer {customer} is not served")
            }
            ViolationType::DuplicateCustomer { customer, count } => {
                write!(f, "customer {customer} is served {count} times")
            }
            ViolationType::Malformed(e) => write!(f, "malformed drone sequences: {e}"),
            ViolationType::LaunchNotBeforeReconvene {
                customer,
                launch_cell,
                reconvene_cell,
            } => write!(
                f,
                "customer {customer}: launch cell {launch_cell} not before reconvene cell {reconvene_cell}"
            ),
            ViolationType::FlightRangeExceeded {
                drone,
                customer,
                flight_time,
                flight_range,
            } => write!(
                f,
                "drone {drone} to customer {customer}: flight {flight_time} exceeds range {flight_range}"
            ),
            ViolationType::OverlappingTrips {
                drone,
                reconvene_cell,
                next_launch_cell,
            } => write!(
                f,
                "drone {drone} launches at cell {next_launch_cell} before landing at cell {reconvene_cell}"
            ),
        }
    }
}
