//! Raw candidate plan in its index-based encoding.

use serde::{Deserialize, Serialize};

use super::Instance;

/// A candidate truck-and-drone plan as produced by a search heuristic.
///
/// This is the boundary encoding: drone customers are grouped per drone by
/// [`Plan::SEPARATOR`], and each drone customer is paired (in emission order)
/// with a 1-based launch cell and reconvene cell pointing into
/// `truck_route`. Nothing here is validated; pass the plan to
/// [`FeasibilityChecker`](crate::evaluation::FeasibilityChecker) or decode it
/// with [`DecodedPlan::decode`](super::DecodedPlan::decode).
///
/// # Examples
///
/// ```
/// use u_strpd::models::Plan;
///
/// // Truck 0 → 1 → 3 → 0; drone 0 serves 2 launching at cell 2, landing at cell 3.
/// let plan = Plan::new(vec![0, 1, 3, 0], vec![2], vec![2], vec![3]);
/// assert_eq!(plan.num_drone_customers(), 1);
/// assert_eq!(plan.separator_count(plan.drone_customers()), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Plan {
    truck_route: Vec<usize>,
    drone_customers: Vec<i64>,
    launch_cells: Vec<i64>,
    reconvene_cells: Vec<i64>,
}

impl Plan {
    /// Value separating one drone's group from the next.
    pub const SEPARATOR: i64 = -1;

    /// Creates a plan from its four sequences.
    pub fn new(
        truck_route: Vec<usize>,
        drone_customers: Vec<i64>,
        launch_cells: Vec<i64>,
        reconvene_cells: Vec<i64>,
    ) -> Self {
        Self {
            truck_route,
            drone_customers,
            launch_cells,
            reconvene_cells,
        }
    }

    /// Creates a plan in which the truck serves every customer.
    pub fn truck_only(truck_route: Vec<usize>) -> Self {
        Self::new(truck_route, Vec::new(), Vec::new(), Vec::new())
    }

    /// The all-truck plan visiting customers in index order.
    ///
    /// Always feasible; useful as a search starting point.
    pub fn trivial(instance: &Instance) -> Self {
        let depot = instance.depot();
        let truck_route = std::iter::once(depot)
            .chain(instance.customers())
            .chain(std::iter::once(depot))
            .collect();
        Self::truck_only(truck_route)
    }

    /// Ordered truck path, depot at both ends.
    pub fn truck_route(&self) -> &[usize] {
        &self.truck_route
    }

    /// Drone customers, grouped per drone by [`Plan::SEPARATOR`].
    pub fn drone_customers(&self) -> &[i64] {
        &self.drone_customers
    }

    /// 1-based launch positions in the truck route.
    pub fn launch_cells(&self) -> &[i64] {
        &self.launch_cells
    }

    /// 1-based reconvene positions in the truck route.
    pub fn reconvene_cells(&self) -> &[i64] {
        &self.reconvene_cells
    }

    /// Number of drone customers, separators excluded.
    pub fn num_drone_customers(&self) -> usize {
        self.drone_customers
            .iter()
            .filter(|&&c| c != Self::SEPARATOR)
            .count()
    }

    /// Number of separators in `values`.
    pub fn separator_count(&self, values: &[i64]) -> usize {
        values.iter().filter(|&&v| v == Self::SEPARATOR).count()
    }

    /// Customers visited by the truck (route interior).
    pub fn truck_customers(&self) -> &[usize] {
        match self.truck_route.len() {
            0..=2 => &[],
            n => &self.truck_route[1..n - 1],
        }
    }
}
