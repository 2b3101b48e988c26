//! Seeded synthetic instances.
//!
//! Nodes are scattered uniformly on a square grid with the depot at its
//! centre. The truck drives on a street grid (Manhattan distance) while
//! drones fly straight lines (Euclidean distance).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::DistanceMatrix;
use crate::error::InstanceError;
use crate::models::Instance;

/// Parameters of [`random_instance`].
///
/// # Examples
///
/// ```
/// use u_strpd::generate::GeneratorConfig;
///
/// let config = GeneratorConfig::new(20)
///     .with_drone_speed(3.0)
///     .with_reachable_share(0.25);
/// assert_eq!(config.n_customers, 20);
/// assert_eq!(config.n_drones, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Number of customers; the instance has one more node for the depot.
    pub n_customers: usize,
    /// Fleet size.
    pub n_drones: usize,
    /// Side length of the square grid.
    pub grid_size: f64,
    /// Truck distance units per time unit.
    pub truck_speed: f64,
    /// Drone distance units per time unit.
    pub drone_speed: f64,
    /// Share of customers the drone can serve out-and-back from the depot.
    pub reachable_share: f64,
}

impl GeneratorConfig {
    /// Creates a configuration for `n_customers` customers.
    pub fn new(n_customers: usize) -> Self {
        Self {
            n_customers,
            ..Self::default()
        }
    }

    /// Sets the fleet size.
    pub fn with_drones(mut self, n_drones: usize) -> Self {
        self.n_drones = n_drones;
        self
    }

    /// Sets the grid side length.
    pub fn with_grid_size(mut self, size: f64) -> Self {
        self.grid_size = size;
        self
    }

    /// Sets the truck speed.
    pub fn with_truck_speed(mut self, speed: f64) -> Self {
        self.truck_speed = speed;
        self
    }

    /// Sets the drone speed.
    pub fn with_drone_speed(mut self, speed: f64) -> Self {
        self.drone_speed = speed;
        self
    }

    /// Sets the share of depot-reachable customers.
    ///
    /// Stored as given; [`random_instance`] reads values outside `[0, 1]`
    /// as the nearest bound and NaN as zero.
    pub fn with_reachable_share(mut self, share: f64) -> Self {
        self.reachable_share = share;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            n_customers: 10,
            n_drones: 2,
            grid_size: 100.0,
            truck_speed: 1.0,
            drone_speed: 2.0,
            reachable_share: 0.5,
        }
    }
}

/// Generates an instance; the same seed and configuration always give the
/// same instance.
///
/// Non-positive speeds surface as [`InstanceError`]s from instance
/// validation. A negative or non-finite grid size collapses to a point.
///
/// # Examples
///
/// ```
/// use u_strpd::evaluation::Oracle;
/// use u_strpd::generate::{random_instance, GeneratorConfig};
/// use u_strpd::models::Plan;
///
/// let instance = random_instance(&GeneratorConfig::new(8), 42).unwrap();
/// assert_eq!(instance.n_customers(), 8);
///
/// let result = Oracle::new(&instance).evaluate(&Plan::trivial(&instance));
/// assert!(result.feasible);
/// ```
pub fn random_instance(config: &GeneratorConfig, seed: u64) -> Result<Instance, InstanceError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n_nodes = config.n_customers + 1;
    let grid = if config.grid_size.is_finite() {
        config.grid_size.max(0.0)
    } else {
        0.0
    };

    let mut positions = Vec::with_capacity(n_nodes);
    positions.push((grid / 2.0, grid / 2.0));
    while positions.len() < n_nodes {
        let x = rng.random_range(0.0..=grid);
        let y = rng.random_range(0.0..=grid);
        positions.push((x, y));
    }

    let mut truck = DistanceMatrix::new(n_nodes);
    let mut drone = DistanceMatrix::new(n_nodes);
    for (i, &(xi, yi)) in positions.iter().enumerate() {
        for (j, &(xj, yj)) in positions.iter().enumerate() {
            if i == j {
                continue;
            }
            let (dx, dy) = ((xi - xj).abs(), (yi - yj).abs());
            truck.set(i, j, (dx + dy) / config.truck_speed);
            drone.set(i, j, dx.hypot(dy) / config.drone_speed);
        }
    }

    let flight_range = reachable_range(&drone, config.reachable_share);
    debug!(
        seed,
        n_customers = config.n_customers,
        flight_range,
        "generated instance"
    );
    Instance::new(truck, drone, config.n_drones, flight_range)
}

/// Smallest range covering the requested share of depot round trips.
fn reachable_range(drone: &DistanceMatrix, share: f64) -> f64 {
    let share = if share.is_nan() { 0.0 } else { share.clamp(0.0, 1.0) };
    let mut round_trips: Vec<f64> = (1..drone.size())
        .map(|c| drone.get(0, c) + drone.get(c, 0))
        .collect();
    let count = (share * round_trips.len() as f64).ceil() as usize;
    if count == 0 {
        return 0.0;
    }
    round_trips.sort_by(f64::total_cmp);
    round_trips[count - 1]
}
