//! Immutable problem instance.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;
use crate::error::InstanceError;

/// A truck-and-drone routing problem instance.
///
/// Holds the truck travel-time matrix, the drone flight-time matrix, the
/// fleet size, and the per-trip flight range. Node 0 is the depot unless
/// changed with [`Instance::with_depot`]. Validated at construction and
/// read-only afterwards, so it can be shared across threads freely.
///
/// # Examples
///
/// ```
/// use u_strpd::distance::DistanceMatrix;
/// use u_strpd::models::Instance;
///
/// let truck = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 20.0],
///     vec![10.0, 0.0, 10.0],
///     vec![20.0, 10.0, 0.0],
/// ]).unwrap();
/// let drone = truck.clone();
///
/// let instance = Instance::new(truck, drone, 2, 30.0).unwrap();
/// assert_eq!(instance.n_nodes(), 3);
/// assert_eq!(instance.n_customers(), 2);
/// assert_eq!(instance.max_separators(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInstance", into = "RawInstance")]
pub struct Instance {
    truck: DistanceMatrix,
    drone: DistanceMatrix,
    n_drones: usize,
    flight_range: f64,
    depot: usize,
}

impl Instance {
    /// Creates a validated instance with the depot at node 0.
    ///
    /// Both matrices must cover the same nodes, with finite non-negative
    /// entries. The fleet needs at least one drone and the flight range must
    /// be finite and non-negative.
    pub fn new(
        truck: DistanceMatrix,
        drone: DistanceMatrix,
        n_drones: usize,
        flight_range: f64,
    ) -> Result<Self, InstanceError> {
        if truck.size() == 0 {
            return Err(InstanceError::Empty);
        }
        if truck.size() != drone.size() {
            return Err(InstanceError::SizeMismatch {
                truck: truck.size(),
                drone: drone.size(),
            });
        }
        truck.validate_entries("truck")?;
        drone.validate_entries("drone")?;
        if n_drones == 0 {
            return Err(InstanceError::NoDrones);
        }
        if !flight_range.is_finite() || flight_range < 0.0 {
            return Err(InstanceError::InvalidFlightRange(flight_range));
        }
        Ok(Self {
            truck,
            drone,
            n_drones,
            flight_range,
            depot: 0,
        })
    }

    /// Moves the depot to another node.
    pub fn with_depot(mut self, depot: usize) -> Result<Self, InstanceError> {
        if depot >= self.n_nodes() {
            return Err(InstanceError::DepotOutOfRange {
                depot,
                n_nodes: self.n_nodes(),
            });
        }
        self.depot = depot;
        Ok(self)
    }

    /// Number of nodes, depot included.
    pub fn n_nodes(&self) -> usize {
        self.truck.size()
    }

    /// Number of customers (nodes other than the depot).
    pub fn n_customers(&self) -> usize {
        self.n_nodes() - 1
    }

    /// Number of drones carried by the truck.
    pub fn n_drones(&self) -> usize {
        self.n_drones
    }

    /// Maximum separators allowed in any drone sequence of a plan.
    pub fn max_separators(&self) -> usize {
        self.n_drones - 1
    }

    /// Depot node.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Returns `true` if `node` is the depot.
    #[inline]
    pub fn is_depot(&self, node: usize) -> bool {
        node == self.depot
    }

    /// Iterates over all customer nodes in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.n_nodes()).filter(move |&n| n != self.depot)
    }

    /// Maximum flight time of a single drone trip.
    pub fn flight_range(&self) -> f64 {
        self.flight_range
    }

    /// Truck travel time between two nodes.
    #[inline]
    pub fn truck_time(&self, from: usize, to: usize) -> f64 {
        self.truck.get(from, to)
    }

    /// Drone flight time between two nodes.
    #[inline]
    pub fn drone_time(&self, from: usize, to: usize) -> f64 {
        self.drone.get(from, to)
    }

    /// Truck travel-time matrix.
    pub fn truck_matrix(&self) -> &DistanceMatrix {
        &self.truck
    }

    /// Drone flight-time matrix.
    pub fn drone_matrix(&self) -> &DistanceMatrix {
        &self.drone
    }
}

/// Serialized form of an [`Instance`], validated on conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawInstance {
    truck_times: Vec<Vec<f64>>,
    drone_times: Vec<Vec<f64>>,
    n_drones: usize,
    flight_range: f64,
    #[serde(default)]
    depot: usize,
}

impl TryFrom<RawInstance> for Instance {
    type Error = InstanceError;

    fn try_from(raw: RawInstance) -> Result<Self, Self::Error> {
        let truck = DistanceMatrix::from_named_rows(raw.truck_times, "truck")?;
        let drone = DistanceMatrix::from_named_rows(raw.drone_times, "drone")?;
        Instance::new(truck, drone, raw.n_drones, raw.flight_range)?.with_depot(raw.depot)
    }
}

impl From<Instance> for RawInstance {
    fn from(instance: Instance) -> Self {
        Self {
            truck_times: instance.truck.to_rows(),
            drone_times: instance.drone.to_rows(),
            n_drones: instance.n_drones,
            flight_range: instance.flight_range,
            depot: instance.depot,
        }
    }
}
