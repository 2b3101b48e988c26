//! Synchronized truck/drone schedule simulation.

use tracing::trace;

use crate::config::{FlightRangePolicy, OracleConfig};
use crate::error::DecodeError;
use crate::models::{
    DecodedPlan, DroneVisit, Instance, Plan, Rule, Schedule, Stop, Violation, ViolationType,
};

/// Computes a schedule from a decoded plan.
///
/// This is the seam between the [`Oracle`](super::Oracle) and its simulator;
/// [`ScheduleSimulator`] is the implementation used in practice.
pub trait Simulate: Send + Sync {
    /// Simulates a plan that passed the feasibility checker.
    fn simulate(&self, plan: &DecodedPlan) -> Schedule;
}

/// Walks the truck route once, resolving drone trips at their reconvene
/// positions and delaying the truck until every drone landing there is back.
///
/// Each drone keeps its own availability time: a trip launches at the later
/// of the truck reaching the launch position and the drone returning from its
/// previous trip. The objective sums customer arrival times (truck and drone)
/// and divides by the configured objective scale.
///
/// Flight range is checked again on the simulated timeline under the
/// configured [`FlightRangePolicy`]; the first violation stops the simulation.
///
/// # Examples
///
/// ```
/// use u_strpd::config::OracleConfig;
/// use u_strpd::distance::DistanceMatrix;
/// use u_strpd::evaluation::ScheduleSimulator;
/// use u_strpd::models::{Instance, Plan};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 20.0],
///     vec![10.0, 0.0, 10.0],
///     vec![20.0, 10.0, 0.0],
/// ]).unwrap();
/// let instance = Instance::new(dm.clone(), dm, 1, 100.0).unwrap();
/// let sim = ScheduleSimulator::new(&instance, OracleConfig::default());
///
/// let schedule = sim.simulate_plan(&Plan::truck_only(vec![0, 1, 2, 0])).unwrap();
/// // Arrivals at 1 and 2: 10 + 20 = 30, reported in hundredths.
/// assert!((schedule.objective() - 0.3).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ScheduleSimulator<'a> {
    instance: &'a Instance,
    config: OracleConfig,
}

impl<'a> ScheduleSimulator<'a> {
    /// Creates a simulator for the given instance.
    pub fn new(instance: &'a Instance, config: OracleConfig) -> Self {
        Self { instance, config }
    }

    /// Configuration in use.
    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    /// Simulates a decoded plan.
    ///
    /// The plan is expected to have passed the feasibility checker; ordering
    /// and launch-before-reconvene are not re-checked here.
    pub fn simulate(&self, plan: &DecodedPlan) -> Schedule {
        simulate_schedule(self.instance, &self.config, plan)
    }

    /// Decodes a raw plan and simulates it.
    ///
    /// Corrupt indices are returned as errors rather than simulated.
    pub fn simulate_plan(&self, plan: &Plan) -> Result<Schedule, DecodeError> {
        let decoded = DecodedPlan::decode(plan, self.instance)?;
        Ok(self.simulate(&decoded))
    }
}

impl Simulate for ScheduleSimulator<'_> {
    fn simulate(&self, plan: &DecodedPlan) -> Schedule {
        simulate_schedule(self.instance, &self.config, plan)
    }
}

fn simulate_schedule(instance: &Instance, config: &OracleConfig, plan: &DecodedPlan) -> Schedule {
    let route = plan.truck_route();
    if route.is_empty() {
        return Schedule::feasible(Vec::new(), Vec::new(), 0.0, 0.0);
    }
    let flight_range = instance.flight_range();

    // reconvene position -> (drone, trip index)
    let mut landings: Vec<Vec<(usize, usize)>> = vec![Vec::new(); route.len()];
    for drone in 0..plan.num_drones() {
        for (t, trip) in plan.trips(drone).iter().enumerate() {
            landings[trip.reconvene_position()].push((drone, t));
        }
    }

    let mut arrivals = vec![0.0_f64; route.len()];
    let mut departures = vec![0.0_f64; route.len()];
    let mut drone_available = vec![0.0_f64; plan.num_drones()];
    let mut drone_visits = Vec::with_capacity(plan.num_trips());
    let mut total = 0.0_f64;

    for i in 1..route.len() {
        let (prev, curr) = (route[i - 1], route[i]);
        let arrival = departures[i - 1] + instance.truck_time(prev, curr);
        arrivals[i] = arrival;
        let mut departure = arrival;

        for &(drone, t) in &landings[i] {
            let trip = &plan.trips(drone)[t];
            let (out, back) = trip.flight_legs(instance);
            let launch_time = arrivals[trip.launch_position()].max(drone_available[drone]);
            let at_customer = launch_time + out;
            let return_time = at_customer + back;

            let hover = match config.flight_range_policy() {
                FlightRangePolicy::IncludeReconveneWait if !instance.is_depot(curr) => {
                    (arrival - return_time).max(0.0)
                }
                _ => 0.0,
            };
            let flight_time = out + back + hover;
            if flight_time > flight_range {
                trace!(drone, customer = trip.customer, flight_time, "flight range exceeded");
                return Schedule::infeasible(Violation::new(
                    Rule::DynamicFlightRange,
                    ViolationType::FlightRangeExceeded {
                        drone,
                        customer: trip.customer,
                        flight_time,
                        flight_range,
                    },
                ));
            }

            trace!(drone, customer = trip.customer, launch_time, return_time, "drone trip");
            drone_available[drone] = return_time;
            total += at_customer;
            departure = departure.max(return_time);
            drone_visits.push(DroneVisit {
                drone,
                customer: trip.customer,
                launch_time,
                arrival_time: at_customer,
                return_time,
            });
        }

        departures[i] = departure;
        if !instance.is_depot(curr) {
            total += arrival;
        }
        trace!(position = i, node = curr, arrival, departure, "truck stop");
    }

    let stops = route
        .iter()
        .enumerate()
        .map(|(position, &node)| Stop {
            position,
            node,
            arrival_time: arrivals[position],
            departure_time: departures[position],
        })
        .collect();
    Schedule::feasible(stops, drone_visits, total, total / config.objective_scale())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;

    /// Truck: 0-1 = 10, 1-2 = 10, 0-2 = 20, customer 3 off-road.
    /// Drone: 0-3 = 12, 3-1 = 8, 3-2 = 15.
    fn setup(flight_range: f64) -> Instance {
        let truck = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 20.0, 50.0],
            vec![10.0, 0.0, 10.0, 50.0],
            vec![20.0, 10.0, 0.0, 50.0],
            vec![50.0, 50.0, 50.0, 0.0],
        ])
        .expect("square");
        let drone = DistanceMatrix::from_rows(vec![
            vec![0.0, 10.0, 20.0, 12.0],
            vec![10.0, 0.0, 10.0, 8.0],
            vec![20.0, 10.0, 0.0, 15.0],
            vec![12.0, 8.0, 15.0, 0.0],
        ])
        .expect("square");
        Instance::new(truck, drone, 2, flight_range).expect("valid")
    }

    fn simulate(instance: &Instance, config: OracleConfig, plan: &Plan) -> Schedule {
        ScheduleSimulator::new(instance, config)
            .simulate_plan(plan)
            .expect("decodes")
    }

    #[test]
    fn test_all_truck_objective() {
        let inst = setup(100.0);
        let mut full = Plan::truck_only(vec![0, 1, 2, 3, 0]);
        let s = simulate(&inst, OracleConfig::default(), &full);
        // arrivals: 1 @10, 2 @20, 3 @70, depot @120
        assert_eq!(s.arrivals(), vec![0.0, 10.0, 20.0, 70.0, 120.0]);
        assert_eq!(s.total_arrival_time(), 100.0);
        assert!((s.objective() - 1.0).abs() < 1e-12);

        full = Plan::truck_only(vec![0, 2, 1, 3, 0]);
        let s = simulate(&inst, OracleConfig::default().with_objective_scale(1.0), &full);
        assert_eq!(s.objective(), 20.0 + 30.0 + 80.0);
    }

    #[test]
    fn test_drone_arrival_counts_toward_objective() {
        let inst = setup(100.0);
        // Drone serves 3 from depot (cell 1), lands at node 1 (cell 2).
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![2]);
        let s = simulate(&inst, OracleConfig::default().with_objective_scale(1.0), &plan);
        assert!(s.is_feasible());
        let visit = s.drone_visits()[0];
        assert_eq!(visit.launch_time, 0.0);
        assert_eq!(visit.arrival_time, 12.0);
        assert_eq!(visit.return_time, 20.0);
        // Truck waits at node 1 from 10 until the drone lands at 20.
        assert_eq!(s.departures()[1], 20.0);
        assert_eq!(s.arrivals()[2], 30.0);
        // 12 (drone at 3) + 10 (truck at 1) + 30 (truck at 2)
        assert_eq!(s.objective(), 52.0);
        assert_eq!(s.arrival_at(3), Some(12.0));
    }

    #[test]
    fn test_truck_not_delayed_by_early_drone() {
        let inst = setup(100.0);
        // Drone 0 → 3 → 0 lands at the depot (cell 4) long before the truck.
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![4]);
        let s = simulate(&inst, OracleConfig::default(), &plan);
        let visit = s.drone_visits()[0];
        assert_eq!(visit.return_time, 12.0 + 12.0);
        // Truck reaches depot at 40, drone back at 24: no delay.
        assert_eq!(s.makespan(), 40.0);
    }

    #[test]
    fn test_drone_waits_for_its_previous_trip() {
        let inst = setup(100.0);
        // One drone: 3 on cells 1→2, then 2 on cells 2→3.
        let plan = Plan::new(vec![0, 1, 0], vec![3, 2], vec![1, 2], vec![2, 3]);
        let s = simulate(&inst, OracleConfig::default().with_objective_scale(1.0), &plan);
        let first = s.drone_visits()[0];
        let second = s.drone_visits()[1];
        // First trip returns at 20 (truck at node 1 since 10).
        assert_eq!(first.return_time, 20.0);
        // Second launch waits for the drone, not the truck (at 1 since 10).
        assert_eq!(second.launch_time, 20.0);
        assert_eq!(second.arrival_time, 30.0);
        assert_eq!(second.return_time, 50.0);
        // Truck leaves 1 at 20, reaches depot at 30, waits for drone until 50.
        assert_eq!(s.departures(), vec![0.0, 20.0, 50.0]);
        assert_eq!(s.objective(), 12.0 + 10.0 + 30.0);
    }

    #[test]
    fn test_two_drones_land_at_same_stop() {
        let inst = setup(100.0);
        let plan = Plan::new(vec![0, 2, 0], vec![3, -1, 1], vec![1, -1, 1], vec![2, -1, 2]);
        let s = simulate(&inst, OracleConfig::default(), &plan);
        // Drone 0: 0 → 3 → 2 = 12 + 15 = 27; drone 1: 0 → 1 → 2 = 10 + 10 = 20.
        assert_eq!(s.drone_visits().len(), 2);
        assert_eq!(s.departures()[1], 27.0);
    }

    #[test]
    fn test_dynamic_range_flight_only() {
        let inst = setup(20.0);
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![2]);
        // Flight 12 + 8 = 20 fits exactly.
        let s = simulate(&inst, OracleConfig::default(), &plan);
        assert!(s.is_feasible());
    }

    #[test]
    fn test_dynamic_range_with_reconvene_wait() {
        let inst = setup(20.0);
        // Drone 0 → 3 → 1 returns at 20; truck takes 0 → 2 → 1 and arrives at 30.
        let plan = Plan::new(vec![0, 2, 1, 0], vec![3], vec![1], vec![3]);
        let lenient = simulate(&inst, OracleConfig::default(), &plan);
        assert!(lenient.is_feasible());

        let strict_config = OracleConfig::default()
            .with_flight_range_policy(FlightRangePolicy::IncludeReconveneWait);
        let strict = simulate(&inst, strict_config, &plan);
        assert!(!strict.is_feasible());
        assert_eq!(strict.objective(), 0.0);
        assert!(matches!(
            strict.violation().map(|v| &v.kind),
            Some(ViolationType::FlightRangeExceeded { flight_time, .. }) if *flight_time == 30.0
        ));
    }

    #[test]
    fn test_reconvene_wait_not_counted_at_depot() {
        let inst = setup(24.0);
        // Drone 0 → 3 → 0 returns at 24; truck back at depot at 40.
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![4]);
        let config = OracleConfig::default()
            .with_flight_range_policy(FlightRangePolicy::IncludeReconveneWait);
        assert!(simulate(&inst, config, &plan).is_feasible());
    }

    #[test]
    fn test_positions_not_nodes_index_the_timeline() {
        let inst = setup(100.0);
        // Drone launches from the depot at cell 1 and lands at the depot at the end.
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![4]);
        let s = simulate(&inst, OracleConfig::default(), &plan);
        assert_eq!(s.drone_visits()[0].launch_time, 0.0);
        assert_eq!(s.stops()[0].arrival_time, 0.0);
        assert_eq!(s.stops()[3].arrival_time, 40.0);
    }

    #[test]
    fn test_simulate_plan_reports_decode_errors() {
        let inst = setup(100.0);
        let sim = ScheduleSimulator::new(&inst, OracleConfig::default());
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3, 1], vec![1], vec![2]);
        assert!(matches!(
            sim.simulate_plan(&plan),
            Err(DecodeError::PairCountMismatch { .. })
        ));
    }

    #[test]
    fn test_simulate_is_deterministic() {
        let inst = setup(100.0);
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![2], vec![3]);
        let decoded = DecodedPlan::decode(&plan, &inst).expect("decodes");
        let sim = ScheduleSimulator::new(&inst, OracleConfig::default());
        let a = sim.simulate(&decoded);
        let b = sim.simulate(&decoded);
        assert_eq!(a, b);
        assert_eq!(a.objective().to_bits(), b.objective().to_bits());
    }
}
