//! Simulated truck and drone timelines.

use super::Violation;

/// The truck's timing at one route position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    /// Zero-based route position.
    pub position: usize,
    /// Node at this position.
    pub node: usize,
    /// Truck arrival time.
    pub arrival_time: f64,
    /// Truck departure time (arrival, delayed by drones landing here).
    pub departure_time: f64,
}

impl Stop {
    /// Time the truck spends waiting for drones at this stop.
    pub fn waiting_time(&self) -> f64 {
        self.departure_time - self.arrival_time
    }
}

/// The timing of one drone trip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DroneVisit {
    /// Drone index.
    pub drone: usize,
    /// Customer served.
    pub customer: usize,
    /// Time the drone leaves the truck.
    pub launch_time: f64,
    /// Time the drone reaches the customer.
    pub arrival_time: f64,
    /// Time the drone is back on the truck's route.
    pub return_time: f64,
}

/// The synchronized schedule of a plan.
///
/// Built by [`ScheduleSimulator`](crate::evaluation::ScheduleSimulator). When
/// the simulation stops on a dynamic flight-range violation the schedule is
/// infeasible, its timeline empty, and its objective zero.
///
/// # Examples
///
/// ```
/// use u_strpd::models::Schedule;
///
/// let s = Schedule::default();
/// assert!(s.is_feasible());
/// assert_eq!(s.objective(), 0.0);
/// assert!(s.stops().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    stops: Vec<Stop>,
    drone_visits: Vec<DroneVisit>,
    total_arrival_time: f64,
    objective: f64,
    violation: Option<Violation>,
}

impl Schedule {
    pub(crate) fn feasible(
        stops: Vec<Stop>,
        drone_visits: Vec<DroneVisit>,
        total_arrival_time: f64,
        objective: f64,
    ) -> Self {
        Self {
            stops,
            drone_visits,
            total_arrival_time,
            objective,
            violation: None,
        }
    }

    pub(crate) fn infeasible(violation: Violation) -> Self {
        Self {
            violation: Some(violation),
            ..Self::default()
        }
    }

    /// Returns `true` if no dynamic violation stopped the simulation.
    pub fn is_feasible(&self) -> bool {
        self.violation.is_none()
    }

    /// The violation that stopped the simulation, if any.
    pub fn violation(&self) -> Option<&Violation> {
        self.violation.as_ref()
    }

    /// Sum of customer arrival times in reporting units.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Sum of customer arrival times in internal time units.
    pub fn total_arrival_time(&self) -> f64 {
        self.total_arrival_time
    }

    /// Truck timing per route position, depot start included.
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// Drone trip timings in the order they were resolved.
    pub fn drone_visits(&self) -> &[DroneVisit] {
        &self.drone_visits
    }

    /// Truck arrival time per route position.
    pub fn arrivals(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.arrival_time).collect()
    }

    /// Truck departure time per route position.
    pub fn departures(&self) -> Vec<f64> {
        self.stops.iter().map(|s| s.departure_time).collect()
    }

    /// Time the truck is back at the end of its route.
    pub fn makespan(&self) -> f64 {
        self.stops.last().map_or(0.0, |s| s.departure_time)
    }

    /// Arrival time at `customer`, whether truck- or drone-served.
    pub fn arrival_at(&self, customer: usize) -> Option<f64> {
        self.drone_visits
            .iter()
            .find(|v| v.customer == customer)
            .map(|v| v.arrival_time)
            .or_else(|| {
                self.stops
                    .iter()
                    .skip(1)
                    .find(|s| s.node == customer)
                    .map(|s| s.arrival_time)
            })
    }
}
