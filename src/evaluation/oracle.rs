//! Oracle: feasibility check, then simulation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{FeasibilityChecker, FeasibilityVerdict, ScheduleSimulator, Simulate};
use crate::config::OracleConfig;
use crate::error::{ConfigError, PlanParseError};
use crate::models::{Instance, Plan, Schedule, Violation};

/// Feasibility and objective of one plan.
///
/// Infeasible plans always carry an objective of zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// `true` if the plan passed every static and dynamic check.
    pub feasible: bool,
    /// Sum of customer arrival times in reporting units.
    pub objective: f64,
}

impl EvaluationResult {
    /// A feasible result with the given objective.
    pub fn feasible(objective: f64) -> Self {
        Self {
            feasible: true,
            objective,
        }
    }

    /// An infeasible result.
    pub fn infeasible() -> Self {
        Self {
            feasible: false,
            objective: 0.0,
        }
    }
}

/// Full outcome of an evaluation, for callers that need more than the
/// feasible/objective pair.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Rejected by the feasibility checker; the simulator never ran.
    Rejected(Violation),
    /// Simulated; the schedule may still carry a dynamic violation.
    Simulated(Schedule),
}

impl Evaluation {
    /// Collapses into the feasible/objective pair.
    pub fn result(&self) -> EvaluationResult {
        match self {
            Self::Simulated(s) if s.is_feasible() => EvaluationResult::feasible(s.objective()),
            _ => EvaluationResult::infeasible(),
        }
    }

    /// The violation that made the plan infeasible, if any.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Rejected(v) => Some(v),
            Self::Simulated(s) => s.violation(),
        }
    }

    /// The simulated schedule, if the plan reached the simulator.
    pub fn schedule(&self) -> Option<&Schedule> {
        match self {
            Self::Rejected(_) => None,
            Self::Simulated(s) => Some(s),
        }
    }
}

/// Evaluates candidate plans against one instance.
///
/// The single entry point for search code. Each call runs the
/// [`FeasibilityChecker`] and, only if it passes, the simulator. Holds no
/// mutable state, so one oracle can serve many threads.
///
/// # Examples
///
/// ```
/// use u_strpd::distance::DistanceMatrix;
/// use u_strpd::evaluation::Oracle;
/// use u_strpd::models::{Instance, Plan};
///
/// let truck = DistanceMatrix::from_rows(vec![
///     vec![0.0, 10.0, 20.0],
///     vec![10.0, 0.0, 10.0],
///     vec![20.0, 10.0, 0.0],
/// ]).unwrap();
/// let instance = Instance::new(truck.clone(), truck, 1, 30.0).unwrap();
/// let oracle = Oracle::new(&instance);
///
/// let result = oracle.evaluate(&Plan::truck_only(vec![0, 1, 2, 0]));
/// assert!(result.feasible);
/// assert!((result.objective - 0.3).abs() < 1e-12);
///
/// // Customer 2 served twice.
/// let result = oracle.evaluate_str("0,1,2,0|2|1|2").unwrap();
/// assert!(!result.feasible);
/// assert_eq!(result.objective, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Oracle<'a, S = ScheduleSimulator<'a>> {
    instance: &'a Instance,
    simulator: S,
}

impl<'a> Oracle<'a> {
    /// Creates an oracle with the default configuration.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            simulator: ScheduleSimulator::new(instance, OracleConfig::default()),
        }
    }

    /// Creates an oracle with a validated configuration.
    pub fn with_config(instance: &'a Instance, config: OracleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            instance,
            simulator: ScheduleSimulator::new(instance, config),
        })
    }
}

impl<'a, S: Simulate> Oracle<'a, S> {
    /// Replaces the simulator.
    pub fn with_simulator<T: Simulate>(self, simulator: T) -> Oracle<'a, T> {
        Oracle {
            instance: self.instance,
            simulator,
        }
    }

    /// The instance plans are evaluated against.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// A feasibility checker for the same instance.
    pub fn checker(&self) -> FeasibilityChecker<'a> {
        FeasibilityChecker::new(self.instance)
    }

    /// Evaluates a plan: `{ feasible, objective }`.
    pub fn evaluate(&self, plan: &Plan) -> EvaluationResult {
        self.evaluate_detailed(plan).result()
    }

    /// Evaluates a plan, keeping the violation or schedule.
    pub fn evaluate_detailed(&self, plan: &Plan) -> Evaluation {
        match self.checker().check(plan) {
            FeasibilityVerdict::Infeasible(violation) => {
                debug!(rule = ?violation.rule(), %violation, "plan rejected");
                Evaluation::Rejected(violation)
            }
            FeasibilityVerdict::Feasible(decoded) => {
                let schedule = self.simulator.simulate(&decoded);
                if let Some(violation) = schedule.violation() {
                    debug!(rule = ?violation.rule(), %violation, "plan rejected in simulation");
                }
                Evaluation::Simulated(schedule)
            }
        }
    }

    /// Parses a plan in text form and evaluates it.
    pub fn evaluate_str(&self, text: &str) -> Result<EvaluationResult, PlanParseError> {
        let plan: Plan = text.parse()?;
        Ok(self.evaluate(&plan))
    }

    /// Evaluates independent plans, in parallel with the `parallel` feature.
    ///
    /// Results are in input order.
    pub fn evaluate_many(&self, plans: &[Plan]) -> Vec<EvaluationResult> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            plans.par_iter().map(|p| self.evaluate(p)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            plans.iter().map(|p| self.evaluate(p)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::config::FlightRangePolicy;
    use crate::distance::DistanceMatrix;
    use crate::models::{DecodedPlan, Rule};

    /// Nodes on a line at 0, 10, 20, 30; drones twice as fast as the truck.
    fn setup(n_drones: usize, flight_range: f64) -> Instance {
        let mut truck = DistanceMatrix::new(4);
        let mut drone = DistanceMatrix::new(4);
        for i in 0..4 {
            for j in 0..4 {
                let d = (i as f64 - j as f64).abs() * 10.0;
                truck.set(i, j, d);
                drone.set(i, j, d / 2.0);
            }
        }
        Instance::new(truck, drone, n_drones, flight_range).expect("valid")
    }

    #[derive(Default)]
    struct CountingSimulator {
        calls: AtomicUsize,
    }

    impl Simulate for &CountingSimulator {
        fn simulate(&self, _plan: &DecodedPlan) -> Schedule {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Schedule::default()
        }
    }

    #[test]
    fn test_all_truck_scenario() {
        let inst = setup(1, 100.0);
        let oracle = Oracle::new(&inst);
        let result = oracle.evaluate(&Plan::truck_only(vec![0, 1, 2, 3, 0]));
        // 10 + 20 + 30 = 60, scaled by 100.
        assert_eq!(result, EvaluationResult::feasible(0.6));
    }

    #[test]
    fn test_infeasible_overlap_scenario() {
        let inst = setup(1, 100.0);
        let oracle = Oracle::new(&inst);
        let plan = Plan::new(vec![0, 1, 0], vec![2, 3], vec![1, 1], vec![2, 3]);
        let eval = oracle.evaluate_detailed(&plan);
        assert_eq!(eval.result(), EvaluationResult::infeasible());
        assert_eq!(eval.violation().map(Violation::rule), Some(Rule::DroneTrips));
        assert!(eval.schedule().is_none());
    }

    #[test]
    fn test_flight_range_violation_scenario() {
        // Drone 0 → 3 → 1: 15 + 10 = 25.
        let plan = Plan::new(vec![0, 2, 1, 0], vec![3], vec![1], vec![3]);
        let fits = setup(1, 25.0);
        assert!(Oracle::new(&fits).evaluate(&plan).feasible);

        let short = setup(1, 24.0);
        assert_eq!(
            Oracle::new(&short).evaluate(&plan),
            EvaluationResult::infeasible()
        );
    }

    #[test]
    fn test_synchronization_wait_scenario() {
        let inst = setup(1, 100.0);
        let oracle = Oracle::new(&inst);
        // Drone 0 → 3 → 1 returns at 25; truck reaches 1 at 10.
        let plan = Plan::new(vec![0, 1, 2, 0], vec![3], vec![1], vec![2]);
        let eval = oracle.evaluate_detailed(&plan);
        let schedule = eval.schedule().expect("simulated");
        assert_eq!(schedule.arrivals()[1], 10.0);
        assert_eq!(schedule.departures()[1], 25.0);
        assert_eq!(schedule.arrivals()[2], 35.0);
        // 15 (drone at 3) + 10 + 35
        assert!((eval.result().objective - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_dynamic_violation_is_infeasible() {
        let inst = setup(1, 25.0);
        let config = OracleConfig::default()
            .with_flight_range_policy(FlightRangePolicy::IncludeReconveneWait);
        let oracle = Oracle::with_config(&inst, config).expect("valid config");
        // Flight 25 fits statically; truck reaches 1 via 2 at 30, drone hovers 5.
        let plan = Plan::new(vec![0, 2, 1, 0], vec![3], vec![1], vec![3]);
        let eval = oracle.evaluate_detailed(&plan);
        assert_eq!(eval.result(), EvaluationResult::infeasible());
        assert_eq!(
            eval.violation().map(Violation::rule),
            Some(Rule::DynamicFlightRange)
        );
    }

    #[test]
    fn test_rejected_plan_skips_simulator() {
        let inst = setup(1, 100.0);
        let counter = CountingSimulator::default();
        let oracle = Oracle::new(&inst).with_simulator(&counter);

        oracle.evaluate(&Plan::truck_only(vec![0, 1, 0]));
        oracle.evaluate(&Plan::truck_only(vec![1, 2, 3, 0]));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 0);

        oracle.evaluate(&Plan::truck_only(vec![0, 1, 2, 3, 0]));
        assert_eq!(counter.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let inst = setup(1, 100.0);
        let config = OracleConfig::default().with_objective_scale(0.0);
        assert!(Oracle::with_config(&inst, config).is_err());
    }

    #[test]
    fn test_evaluate_str() {
        let inst = setup(2, 100.0);
        let oracle = Oracle::new(&inst);
        let result = oracle.evaluate_str("0,1,2,0,|3,-1|1,-1|3,-1").expect("parses");
        assert!(result.feasible);
        assert!(oracle.evaluate_str("0,1,2,0|3|1").is_err());
    }

    #[test]
    fn test_unmirrored_separators_are_infeasible() {
        let inst = setup(2, 100.0);
        let oracle = Oracle::new(&inst);
        for text in ["0,1,0|2,-1,3|1,2|2,3", "0,1,0|2,-1,3|1,-1,2|2,3"] {
            let eval = oracle.evaluate_detailed(&text.parse().expect("parses"));
            assert_eq!(eval.result(), EvaluationResult::infeasible(), "{text}");
            assert_eq!(
                eval.violation().map(Violation::rule),
                Some(Rule::StructuralConsistency),
                "{text}"
            );
        }
        let mirrored = oracle.evaluate_str("0,1,0|2,-1,3|1,-1,2|2,-1,3").expect("parses");
        assert!(mirrored.feasible);
    }

    #[test]
    fn test_evaluate_many_keeps_order() {
        let inst = setup(1, 100.0);
        let oracle = Oracle::new(&inst);
        let plans = vec![
            Plan::truck_only(vec![0, 1, 2, 3, 0]),
            Plan::truck_only(vec![0, 1, 0]),
            Plan::truck_only(vec![0, 3, 2, 1, 0]),
        ];
        let results = oracle.evaluate_many(&plans);
        assert_eq!(results.len(), 3);
        assert!(results[0].feasible);
        assert!(!results[1].feasible);
        assert_eq!(results[2], oracle.evaluate(&plans[2]));
    }

    #[test]
    fn test_oracle_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Oracle<'static>>();
        assert_send_sync::<Instance>();
    }

    #[test]
    fn test_result_serializes() {
        let json = serde_json::to_string(&EvaluationResult::feasible(1.5)).expect("serialize");
        assert_eq!(json, r#"{"feasible":true,"objective":1.5}"#);
    }
}
