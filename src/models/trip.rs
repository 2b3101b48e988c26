//! Decoded drone trips.

use super::{Instance, Plan};
use crate::error::DecodeError;

/// One drone mission: launch node → customer → reconvene node.
///
/// Cells are the 1-based truck-route positions from the encoding; nodes are
/// resolved from them once at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trip {
    /// Customer served by the drone.
    pub customer: usize,
    /// 1-based truck-route position where the drone departs.
    pub launch_cell: usize,
    /// 1-based truck-route position where the drone lands.
    pub reconvene_cell: usize,
    /// Node at `launch_cell`.
    pub launch_node: usize,
    /// Node at `reconvene_cell`.
    pub reconvene_node: usize,
}

impl Trip {
    /// Zero-based truck-route position of the launch.
    #[inline]
    pub fn launch_position(&self) -> usize {
        self.launch_cell - 1
    }

    /// Zero-based truck-route position of the landing.
    #[inline]
    pub fn reconvene_position(&self) -> usize {
        self.reconvene_cell - 1
    }

    /// Outbound and return flight times.
    #[inline]
    pub fn flight_legs(&self, instance: &Instance) -> (f64, f64) {
        (
            instance.drone_time(self.launch_node, self.customer),
            instance.drone_time(self.customer, self.reconvene_node),
        )
    }

    /// Total flight time, excluding any wait.
    pub fn flight_time(&self, instance: &Instance) -> f64 {
        let (out, back) = self.flight_legs(instance);
        out + back
    }
}

/// A plan whose drone trips have been grouped per drone and resolved to nodes.
///
/// Every node, customer, and cell held here is in range for the instance it
/// was decoded against. Ordering and flight-range rules are *not* implied;
/// those are checked by the feasibility checker.
///
/// # Examples
///
/// ```
/// use u_strpd::distance::DistanceMatrix;
/// use u_strpd::models::{DecodedPlan, Instance, Plan};
///
/// let dm = DistanceMatrix::new(4);
/// let instance = Instance::new(dm.clone(), dm, 2, 10.0).unwrap();
/// let plan = Plan::new(vec![0, 1, 0], vec![2, -1, 3], vec![1, -1, 2], vec![2, -1, 3]);
///
/// let decoded = DecodedPlan::decode(&plan, &instance).unwrap();
/// assert_eq!(decoded.trips(0)[0].reconvene_node, 1);
/// assert_eq!(decoded.trips(1)[0].customer, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPlan {
    truck_route: Vec<usize>,
    drones: Vec<Vec<Trip>>,
}

impl DecodedPlan {
    /// Decodes a plan against an instance.
    ///
    /// Walks the drone customers once, advancing to the next drone on each
    /// separator, and pairs every customer with the next launch and reconvene
    /// cell (separators in the cell sequences skipped). Fails on the first
    /// corrupt index; nothing is clamped or truncated.
    pub fn decode(plan: &Plan, instance: &Instance) -> Result<Self, DecodeError> {
        let n_nodes = instance.n_nodes();
        let n_drones = instance.n_drones();
        let route = plan.truck_route();

        let stray = route.iter().enumerate().find(|&(_, &n)| n >= n_nodes);
        if let Some((position, &node)) = stray {
            return Err(DecodeError::NodeOutOfRange {
                position,
                node,
                n_nodes,
            });
        }

        let groups = plan.separator_count(plan.drone_customers()) + 1;
        if groups > n_drones {
            return Err(DecodeError::DroneIndexOutOfRange {
                group: groups - 1,
                n_drones,
            });
        }

        let customers = plan.num_drone_customers();
        let launches = non_separators(plan.launch_cells()).count();
        let reconvenes = non_separators(plan.reconvene_cells()).count();
        if launches != customers || reconvenes != customers {
            return Err(DecodeError::PairCountMismatch {
                customers,
                launches,
                reconvenes,
            });
        }
        check_mirrored("launch_cells", plan.drone_customers(), plan.launch_cells())?;
        check_mirrored(
            "reconvene_cells",
            plan.drone_customers(),
            plan.reconvene_cells(),
        )?;

        let mut drones = vec![Vec::new(); n_drones];
        let mut pairs =
            non_separators(plan.launch_cells()).zip(non_separators(plan.reconvene_cells()));
        let mut group = 0;

        for &entry in plan.drone_customers() {
            if entry == Plan::SEPARATOR {
                group += 1;
                continue;
            }
            let customer = usize::try_from(entry)
                .ok()
                .filter(|&c| c < n_nodes)
                .ok_or(DecodeError::CustomerOutOfRange {
                    customer: entry,
                    n_nodes,
                })?;
            let (launch, reconvene) = pairs.next().ok_or(DecodeError::PairCountMismatch {
                customers,
                launches,
                reconvenes,
            })?;
            let launch_cell = resolve_cell(launch, customer, route.len())?;
            let reconvene_cell = resolve_cell(reconvene, customer, route.len())?;
            let trips: &mut Vec<Trip> = drones
                .get_mut(group)
                .ok_or(DecodeError::DroneIndexOutOfRange { group, n_drones })?;
            trips.push(Trip {
                customer,
                launch_cell,
                reconvene_cell,
                launch_node: route[launch_cell - 1],
                reconvene_node: route[reconvene_cell - 1],
            });
        }

        Ok(Self {
            truck_route: route.to_vec(),
            drones,
        })
    }

    /// Truck route, depot at both ends.
    pub fn truck_route(&self) -> &[usize] {
        &self.truck_route
    }

    /// Number of drone slots (the fleet size).
    pub fn num_drones(&self) -> usize {
        self.drones.len()
    }

    /// Ordered trips of one drone.
    ///
    /// # Panics
    ///
    /// Panics if `drone` is not below [`num_drones`](Self::num_drones).
    pub fn trips(&self, drone: usize) -> &[Trip] {
        &self.drones[drone]
    }

    /// All trips with their drone index, drone by drone.
    pub fn all_trips(&self) -> impl Iterator<Item = (usize, &Trip)> {
        self.drones
            .iter()
            .enumerate()
            .flat_map(|(d, trips)| trips.iter().map(move |t| (d, t)))
    }

    /// Total number of drone trips.
    pub fn num_trips(&self) -> usize {
        self.drones.iter().map(Vec::len).sum()
    }
}

fn non_separators(values: &[i64]) -> impl Iterator<Item = i64> + '_ {
    values.iter().copied().filter(|&v| v != Plan::SEPARATOR)
}

/// Cell sequences place separators exactly where the drone customers do,
/// with the same length.
fn check_mirrored(
    sequence: &'static str,
    customers: &[i64],
    cells: &[i64],
) -> Result<(), DecodeError> {
    let mismatch = customers
        .iter()
        .zip(cells)
        .position(|(&c, &l)| (c == Plan::SEPARATOR) != (l == Plan::SEPARATOR));
    match mismatch {
        Some(position) => Err(DecodeError::SeparatorMisaligned { sequence, position }),
        None if customers.len() != cells.len() => Err(DecodeError::SeparatorMisaligned {
            sequence,
            position: customers.len().min(cells.len()),
        }),
        None => Ok(()),
    }
}

fn resolve_cell(cell: i64, customer: usize, route_len: usize) -> Result<usize, DecodeError> {
    usize::try_from(cell)
        .ok()
        .filter(|&c| (1..=route_len).contains(&c))
        .ok_or(DecodeError::CellOutOfRange {
            customer,
            cell,
            route_len,
        })
}
